//! WebSocket message DTOs.
//!
//! Every frame is a JSON text frame of the form
//! `{"event": "<kebab-case name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};

/// Rendering parameters as they appear on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualParametersDto {
    pub speed: f64,
    pub intensity: f64,
    pub color_scheme: String,
    pub effect_ids: Vec<String>,
}

/// Full visual state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualStateDto {
    pub active_theme: String,
    pub parameters: VisualParametersDto,
    pub active_users: usize,
    /// RFC 3339 UTC timestamp
    pub last_updated: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParametersPatchDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_ids: Option<Vec<String>>,
}

/// Payload of `update-visuals`.
///
/// Unknown keys (including `activeUsers` and `lastUpdated`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualStatePatchDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParametersPatchDto>,
}

/// Client-to-server events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    UpdateVisuals(VisualStatePatchDto),
    ChangeTheme(String),
    TriggerEffect(String),
}

/// Server-to-client events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    InitialState(VisualStateDto),
    VisualUpdate(VisualStateDto),
    ThemeChanged {
        theme: String,
    },
    EffectTriggered {
        #[serde(rename = "effectId")]
        effect_id: String,
    },
    UserCountUpdate {
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_update_visuals_ignores_hub_owned_fields() {
        // テスト項目: update-visuals の activeUsers と未知のフィールドは無視される
        // given (前提条件):
        let json = r#"{"event":"update-visuals","data":{"parameters":{"speed":80},"activeUsers":999,"glitter":true}}"#;

        // when (操作):
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            msg,
            ClientMessage::UpdateVisuals(VisualStatePatchDto {
                active_theme: None,
                parameters: Some(ParametersPatchDto {
                    speed: Some(80.0),
                    ..Default::default()
                }),
            })
        );
    }

    #[test]
    fn test_decode_change_theme_and_trigger_effect() {
        // テスト項目: change-theme と trigger-effect は文字列ペイロードでデコードされる
        // given (前提条件):
        let theme = r#"{"event":"change-theme","data":"wizard"}"#;
        let effect = r#"{"event":"trigger-effect","data":"sparkle"}"#;

        // when (操作):
        let theme: ClientMessage = serde_json::from_str(theme).unwrap();
        let effect: ClientMessage = serde_json::from_str(effect).unwrap();

        // then (期待する結果):
        assert_eq!(theme, ClientMessage::ChangeTheme("wizard".to_string()));
        assert_eq!(effect, ClientMessage::TriggerEffect("sparkle".to_string()));
    }

    #[test]
    fn test_decode_unknown_event_fails() {
        // テスト項目: 未知のイベント名はデコードに失敗する
        // given (前提条件):
        let json = r#"{"event":"drop-the-bass","data":{}}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientMessage>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_effect_triggered_uses_camel_case_payload() {
        // テスト項目: effect-triggered のペイロードは effectId キーで送られる
        // given (前提条件):
        let msg = ServerMessage::EffectTriggered {
            effect_id: "sparkle".to_string(),
        };

        // when (操作):
        let value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            serde_json::json!({"event": "effect-triggered", "data": {"effectId": "sparkle"}})
        );
    }

    #[test]
    fn test_encode_user_count_update() {
        // テスト項目: user-count-update は count を持つオブジェクトで送られる
        // given (前提条件):
        let msg = ServerMessage::UserCountUpdate { count: 3 };

        // when (操作):
        let json = serde_json::to_string(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"event":"user-count-update","data":{"count":3}}"#);
    }
}
