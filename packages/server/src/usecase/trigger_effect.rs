//! UseCase: エフェクト発火処理
//!
//! 状態は変更せず、`effect-triggered` を送信者を含む全セッションに中継する。

use std::sync::Arc;

use crate::domain::{HubEvent, HubRepository, MessagePusher, SessionId};

use super::{HubEventLoop, error::BroadcastError};

/// エフェクト発火のユースケース
pub struct TriggerEffectUseCase {
    repository: Arc<dyn HubRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    event_loop: Arc<HubEventLoop>,
}

impl TriggerEffectUseCase {
    pub fn new(
        repository: Arc<dyn HubRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        event_loop: Arc<HubEventLoop>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            event_loop,
        }
    }

    pub async fn execute(
        &self,
        from: &SessionId,
        effect_id: String,
    ) -> Result<Vec<SessionId>, BroadcastError> {
        let _turn = self.event_loop.turn().await;

        let targets = self.repository.get_all_session_ids().await;
        tracing::debug!("Effect '{}' triggered by '{}'", effect_id, from);
        self.message_pusher
            .broadcast(targets.clone(), &HubEvent::EffectTriggered { effect_id })
            .await?;

        Ok(targets)
    }
}
