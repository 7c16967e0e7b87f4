//! UseCase: テーマ変更処理

use std::sync::Arc;

use merlinfest_shared::time::Clock;

use crate::domain::{HubEvent, HubRepository, MessagePusher, SessionId, Timestamp, VisualState};

use super::{HubEventLoop, error::BroadcastError};

/// テーマ変更のユースケース
///
/// `theme-changed` は送信者を含む全セッションに届く。
pub struct ChangeThemeUseCase {
    repository: Arc<dyn HubRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    event_loop: Arc<HubEventLoop>,
}

impl ChangeThemeUseCase {
    pub fn new(
        repository: Arc<dyn HubRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        event_loop: Arc<HubEventLoop>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            event_loop,
        }
    }

    pub async fn execute(
        &self,
        from: &SessionId,
        theme: String,
    ) -> Result<VisualState, BroadcastError> {
        let _turn = self.event_loop.turn().await;

        let now = Timestamp::new(self.clock.now_millis());
        let state = self.repository.change_theme(theme.clone(), now).await;

        let targets = self.repository.get_all_session_ids().await;
        self.message_pusher
            .broadcast(targets, &HubEvent::ThemeChanged { theme })
            .await?;

        tracing::info!("Theme changed to '{}' by '{}'", state.active_theme, from);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Session,
        usecase::test_support::{
            START, clock_at, create_test_message_pusher, create_test_repository, drain,
            event_loop, sid,
        },
    };
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_change_theme_reaches_sender_too() {
        // テスト項目: テーマ変更は送信者を含む全員に theme-changed で通知される
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let (tx_alice, mut rx_alice) = mpsc::unbounded_channel();
        let (tx_bob, mut rx_bob) = mpsc::unbounded_channel();
        for (id, tx) in [("alice", tx_alice), ("bob", tx_bob)] {
            repository
                .add_session(Session::new(sid(id), Timestamp::new(START)))
                .await
                .unwrap();
            message_pusher.register_client(sid(id), tx).await;
        }
        let usecase = ChangeThemeUseCase::new(
            repository.clone(),
            message_pusher,
            clock_at(START + 500),
            event_loop(),
        );

        // when (操作):
        let state = usecase
            .execute(&sid("alice"), "wizard".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(state.active_theme, "wizard");
        assert!(state.last_updated >= Timestamp::new(START + 500));
        for rx in [&mut rx_alice, &mut rx_bob] {
            let frames = drain(rx);
            assert_eq!(frames.len(), 1);
            assert_eq!(
                frames[0],
                serde_json::json!({"event": "theme-changed", "data": {"theme": "wizard"}})
            );
        }
    }
}
