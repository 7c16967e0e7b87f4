//! Local copy of the hub state kept by the sync agent.

use merlinfest_server::{
    domain::{Timestamp, VisualState, VisualStatePatch},
    infrastructure::dto::websocket::ServerMessage,
};

use super::listeners::SyncEvent;
use crate::error::ClientError;

/// Lifecycle of the agent's link to the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// What this client currently believes the hub looks like.
///
/// `visual_state.active_users` doubles as the live user count.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalView {
    pub visual_state: VisualState,
    pub last_effect: Option<String>,
}

impl LocalView {
    pub fn new(now: Timestamp) -> Self {
        Self {
            visual_state: VisualState::new(now),
            last_effect: None,
        }
    }

    pub fn user_count(&self) -> usize {
        self.visual_state.active_users
    }

    /// Fold one server event into the view and return the event to hand to
    /// listeners.
    pub fn apply(&mut self, message: ServerMessage, now: Timestamp) -> Result<SyncEvent, ClientError> {
        match message {
            ServerMessage::InitialState(dto) => {
                let state = VisualState::try_from(dto)
                    .map_err(|e| ClientError::InvalidState(e.to_string()))?;
                self.visual_state = state.clone();
                Ok(SyncEvent::InitialState(state))
            }
            ServerMessage::VisualUpdate(dto) => {
                let state = VisualState::try_from(dto)
                    .map_err(|e| ClientError::InvalidState(e.to_string()))?;
                self.visual_state = state.clone();
                Ok(SyncEvent::VisualUpdate(state))
            }
            ServerMessage::ThemeChanged { theme } => {
                self.visual_state.set_theme(theme.clone(), now);
                Ok(SyncEvent::ThemeChanged { theme })
            }
            ServerMessage::EffectTriggered { effect_id } => {
                self.last_effect = Some(effect_id.clone());
                Ok(SyncEvent::EffectTriggered { effect_id })
            }
            ServerMessage::UserCountUpdate { count } => {
                self.visual_state.active_users = count;
                Ok(SyncEvent::UserCountUpdate { count })
            }
        }
    }

    /// Apply a local intent before the hub has confirmed it.
    pub fn apply_optimistic_patch(&mut self, patch: VisualStatePatch, now: Timestamp) {
        self.visual_state.apply_patch(patch, now);
    }

    pub fn apply_optimistic_theme(&mut self, theme: String, now: Timestamp) {
        self.visual_state.set_theme(theme, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merlinfest_server::{
        domain::ParametersPatch,
        infrastructure::dto::websocket::{VisualParametersDto, VisualStateDto},
    };

    const START: i64 = 1_700_000_000_000;

    fn view() -> LocalView {
        LocalView::new(Timestamp::new(START))
    }

    fn state_dto(theme: &str, users: usize) -> VisualStateDto {
        VisualStateDto {
            active_theme: theme.to_string(),
            parameters: VisualParametersDto {
                speed: 80.0,
                intensity: 50.0,
                color_scheme: "#ff5500".to_string(),
                effect_ids: vec!["sparkle".to_string()],
            },
            active_users: users,
            last_updated: "2023-11-14T22:13:20.000Z".to_string(),
        }
    }

    #[test]
    fn test_initial_state_replaces_local_copy() {
        // テスト項目: initial-state でローカルの状態が丸ごと置き換わる
        // given (前提条件):
        let mut view = view();

        // when (操作):
        let event = view
            .apply(
                ServerMessage::InitialState(state_dto("cosmic", 3)),
                Timestamp::new(START),
            )
            .unwrap();

        // then (期待する結果):
        assert_eq!(view.visual_state.active_theme, "cosmic");
        assert_eq!(view.visual_state.parameters.speed, 80.0);
        assert_eq!(view.user_count(), 3);
        assert_eq!(event, SyncEvent::InitialState(view.visual_state.clone()));
    }

    #[test]
    fn test_user_count_update_changes_only_count() {
        // テスト項目: user-count-update は人数だけを更新する
        // given (前提条件):
        let mut view = view();
        let before = view.visual_state.clone();

        // when (操作):
        let event = view
            .apply(
                ServerMessage::UserCountUpdate { count: 7 },
                Timestamp::new(START + 1),
            )
            .unwrap();

        // then (期待する結果):
        assert_eq!(view.user_count(), 7);
        assert_eq!(view.visual_state.active_theme, before.active_theme);
        assert_eq!(view.visual_state.parameters, before.parameters);
        assert_eq!(event, SyncEvent::UserCountUpdate { count: 7 });
    }

    #[test]
    fn test_theme_changed_and_effect_triggered() {
        // テスト項目: theme-changed はテーマを、effect-triggered は直近のエフェクトだけを更新する
        // given (前提条件):
        let mut view = view();

        // when (操作):
        view.apply(
            ServerMessage::ThemeChanged {
                theme: "wizard".to_string(),
            },
            Timestamp::new(START + 5),
        )
        .unwrap();
        let parameters = view.visual_state.parameters.clone();
        view.apply(
            ServerMessage::EffectTriggered {
                effect_id: "sparkle".to_string(),
            },
            Timestamp::new(START + 6),
        )
        .unwrap();

        // then (期待する結果):
        assert_eq!(view.visual_state.active_theme, "wizard");
        assert_eq!(view.visual_state.last_updated, Timestamp::new(START + 5));
        assert_eq!(view.visual_state.parameters, parameters);
        assert_eq!(view.last_effect.as_deref(), Some("sparkle"));
    }

    #[test]
    fn test_invalid_timestamp_is_rejected_and_view_is_kept() {
        // テスト項目: lastUpdated が解釈できない状態は拒否され、ローカルの状態は変わらない
        // given (前提条件):
        let mut view = view();
        let before = view.clone();
        let mut dto = state_dto("cosmic", 2);
        dto.last_updated = "yesterday".to_string();

        // when (操作):
        let result = view.apply(ServerMessage::VisualUpdate(dto), Timestamp::new(START));

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::InvalidState(_))));
        assert_eq!(view, before);
    }

    #[test]
    fn test_optimistic_patch_merges_parameters() {
        // テスト項目: 楽観的更新はパラメータをフィールド単位でマージする
        // given (前提条件):
        let mut view = view();

        // when (操作):
        view.apply_optimistic_patch(
            VisualStatePatch::parameters(ParametersPatch {
                speed: Some(80.0),
                ..Default::default()
            }),
            Timestamp::new(START + 10),
        );

        // then (期待する結果):
        assert_eq!(view.visual_state.parameters.speed, 80.0);
        assert_eq!(view.visual_state.parameters.intensity, 50.0);
        assert_eq!(view.visual_state.last_updated, Timestamp::new(START + 10));
    }
}
