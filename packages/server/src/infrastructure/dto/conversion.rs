//! Conversion logic between DTOs and domain entities.

use merlinfest_shared::time::{rfc3339_to_timestamp, timestamp_to_rfc3339};
use thiserror::Error;

use crate::domain::{
    Dj, DomainError, HubEvent, Interaction, NewDj, NewInteraction, NewVote, ParametersPatch,
    StoredVisualState, StoredVisualStateInput, Timestamp, User, UserId, VisualParameters,
    VisualState, VisualStatePatch, Vote,
};
use crate::infrastructure::dto::{http, websocket as dto};

/// Failure to turn an inbound DTO into a domain value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

fn parse_timestamp(value: &str) -> Result<Timestamp, ConversionError> {
    rfc3339_to_timestamp(value)
        .map(Timestamp::new)
        .map_err(|_| ConversionError::InvalidTimestamp(value.to_string()))
}

fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp_to_rfc3339(timestamp.value())
}

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::ParametersPatchDto> for ParametersPatch {
    fn from(dto: dto::ParametersPatchDto) -> Self {
        Self {
            speed: dto.speed,
            intensity: dto.intensity,
            color_scheme: dto.color_scheme,
            effect_ids: dto.effect_ids,
        }
    }
}

impl From<dto::VisualStatePatchDto> for VisualStatePatch {
    fn from(dto: dto::VisualStatePatchDto) -> Self {
        Self {
            active_theme: dto.active_theme,
            parameters: dto.parameters.map(Into::into),
        }
    }
}

impl From<dto::VisualParametersDto> for VisualParameters {
    fn from(dto: dto::VisualParametersDto) -> Self {
        Self {
            speed: dto.speed,
            intensity: dto.intensity,
            color_scheme: dto.color_scheme,
            effect_ids: dto.effect_ids,
        }
    }
}

impl TryFrom<dto::VisualStateDto> for VisualState {
    type Error = ConversionError;

    fn try_from(dto: dto::VisualStateDto) -> Result<Self, Self::Error> {
        Ok(Self {
            active_theme: dto.active_theme,
            parameters: dto.parameters.into(),
            active_users: dto.active_users,
            last_updated: parse_timestamp(&dto.last_updated)?,
        })
    }
}

impl TryFrom<http::CreateVoteRequest> for NewVote {
    type Error = ConversionError;

    fn try_from(request: http::CreateVoteRequest) -> Result<Self, Self::Error> {
        let user_id = UserId::new(request.user_id)?;
        Ok(NewVote::new(user_id, request.theme)?)
    }
}

impl TryFrom<http::CreateInteractionRequest> for NewInteraction {
    type Error = ConversionError;

    fn try_from(request: http::CreateInteractionRequest) -> Result<Self, Self::Error> {
        let user_id = UserId::new(request.user_id)?;
        Ok(NewInteraction::new(
            user_id,
            request.action_type,
            request.details,
        )?)
    }
}

impl From<http::UpsertVisualStateRequest> for StoredVisualStateInput {
    fn from(request: http::UpsertVisualStateRequest) -> Self {
        Self {
            active_theme: request.active_theme,
            speed: request.speed,
            intensity: request.intensity,
            color_scheme: request.color_scheme,
            effect_ids: request.effect_ids,
        }
    }
}

impl TryFrom<http::CreateDjRequest> for NewDj {
    type Error = ConversionError;

    fn try_from(request: http::CreateDjRequest) -> Result<Self, Self::Error> {
        let set_start = parse_timestamp(&request.set_start)?;
        let set_end = parse_timestamp(&request.set_end)?;
        Ok(NewDj::new(
            request.name,
            set_start,
            set_end,
            request.visual_preset,
        )?)
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&VisualParameters> for dto::VisualParametersDto {
    fn from(model: &VisualParameters) -> Self {
        Self {
            speed: model.speed,
            intensity: model.intensity,
            color_scheme: model.color_scheme.clone(),
            effect_ids: model.effect_ids.clone(),
        }
    }
}

impl From<&VisualState> for dto::VisualStateDto {
    fn from(model: &VisualState) -> Self {
        Self {
            active_theme: model.active_theme.clone(),
            parameters: (&model.parameters).into(),
            active_users: model.active_users,
            last_updated: format_timestamp(model.last_updated),
        }
    }
}

impl From<ParametersPatch> for dto::ParametersPatchDto {
    fn from(model: ParametersPatch) -> Self {
        Self {
            speed: model.speed,
            intensity: model.intensity,
            color_scheme: model.color_scheme,
            effect_ids: model.effect_ids,
        }
    }
}

impl From<VisualStatePatch> for dto::VisualStatePatchDto {
    fn from(model: VisualStatePatch) -> Self {
        Self {
            active_theme: model.active_theme,
            parameters: model.parameters.map(Into::into),
        }
    }
}

impl From<&HubEvent> for dto::ServerMessage {
    fn from(event: &HubEvent) -> Self {
        match event {
            HubEvent::InitialState(state) => dto::ServerMessage::InitialState(state.into()),
            HubEvent::VisualUpdate(state) => dto::ServerMessage::VisualUpdate(state.into()),
            HubEvent::ThemeChanged { theme } => dto::ServerMessage::ThemeChanged {
                theme: theme.clone(),
            },
            HubEvent::EffectTriggered { effect_id } => dto::ServerMessage::EffectTriggered {
                effect_id: effect_id.clone(),
            },
            HubEvent::UserCountUpdate { count } => {
                dto::ServerMessage::UserCountUpdate { count: *count }
            }
        }
    }
}

impl From<User> for http::UserDto {
    fn from(model: User) -> Self {
        Self {
            id: model.id.into_string(),
            nickname: model.nickname,
            joined_at: format_timestamp(model.joined_at),
            last_active: format_timestamp(model.last_active),
            vote_count: model.vote_count,
        }
    }
}

impl From<Vote> for http::VoteDto {
    fn from(model: Vote) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id.into_string(),
            theme: model.theme,
            created_at: format_timestamp(model.created_at),
        }
    }
}

impl From<Interaction> for http::InteractionDto {
    fn from(model: Interaction) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id.into_string(),
            action_type: model.action_type,
            details: model.details,
            created_at: format_timestamp(model.created_at),
        }
    }
}

impl From<StoredVisualState> for http::StoredVisualStateDto {
    fn from(model: StoredVisualState) -> Self {
        Self {
            id: model.id,
            active_theme: model.active_theme,
            speed: model.speed,
            intensity: model.intensity,
            color_scheme: model.color_scheme,
            effect_ids: model.effect_ids,
            active_users: model.active_users,
            last_updated: format_timestamp(model.last_updated),
        }
    }
}

impl From<Dj> for http::DjDto {
    fn from(model: Dj) -> Self {
        Self {
            id: model.id,
            name: model.name,
            set_start: format_timestamp(model.set_start),
            set_end: format_timestamp(model.set_end),
            visual_preset: model.visual_preset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_visual_state_to_dto() {
        // テスト項目: ドメインの VisualState が camelCase の DTO に変換される
        // given (前提条件):
        // 2023-01-01 00:00:00.123 UTC
        let state = VisualState::new(Timestamp::new(1672531200123));

        // when (操作):
        let value = serde_json::to_value(dto::VisualStateDto::from(&state)).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            serde_json::json!({
                "activeTheme": "default",
                "parameters": {
                    "speed": 50.0,
                    "intensity": 50.0,
                    "colorScheme": "#ff5500",
                    "effectIds": []
                },
                "activeUsers": 0,
                "lastUpdated": "2023-01-01T00:00:00.123Z"
            })
        );
    }

    #[test]
    fn test_dto_visual_state_to_domain() {
        // テスト項目: DTO の VisualState がドメインに戻せる
        // given (前提条件):
        let original = VisualState::new(Timestamp::new(1672531200123));
        let dto_state = dto::VisualStateDto::from(&original);

        // when (操作):
        let restored = VisualState::try_from(dto_state);

        // then (期待する結果):
        assert_eq!(restored, Ok(original));
    }

    #[test]
    fn test_dto_visual_state_with_bad_timestamp_is_rejected() {
        // テスト項目: 不正な lastUpdated を持つ DTO は変換に失敗する
        // given (前提条件):
        let mut dto_state = dto::VisualStateDto::from(&VisualState::new(Timestamp::new(0)));
        dto_state.last_updated = "not-a-time".to_string();

        // when (操作):
        let result = VisualState::try_from(dto_state);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConversionError::InvalidTimestamp("not-a-time".to_string()))
        );
    }

    #[test]
    fn test_hub_event_to_server_message() {
        // テスト項目: HubEvent が対応する ServerMessage に変換される
        // given (前提条件):
        let event = HubEvent::ThemeChanged {
            theme: "wizard".to_string(),
        };

        // when (操作):
        let msg = dto::ServerMessage::from(&event);

        // then (期待する結果):
        assert_eq!(
            msg,
            dto::ServerMessage::ThemeChanged {
                theme: "wizard".to_string()
            }
        );
    }

    #[test]
    fn test_create_dj_request_with_inverted_window_is_rejected() {
        // テスト項目: 終了が開始より前の DJ リクエストはドメインエラーになる
        // given (前提条件):
        let request = http::CreateDjRequest {
            name: "Merlin".to_string(),
            set_start: "2025-06-21T22:00:00Z".to_string(),
            set_end: "2025-06-21T21:00:00Z".to_string(),
            visual_preset: "cosmic".to_string(),
        };

        // when (操作):
        let result = NewDj::try_from(request);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConversionError::Domain(DomainError::InvalidSetWindow))
        );
    }

    #[test]
    fn test_create_vote_request_with_blank_user_id_is_rejected() {
        // テスト項目: userId が空の投票リクエストは変換に失敗する
        // given (前提条件):
        let request = http::CreateVoteRequest {
            user_id: "".to_string(),
            theme: "fantasy".to_string(),
        };

        // when (操作):
        let result = NewVote::try_from(request);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConversionError::Domain(DomainError::EmptyIdentifier(
                "user id"
            )))
        );
    }
}
