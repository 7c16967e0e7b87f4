//! UseCase: セッション切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//! - 残りのセッションに新しい人数が通知されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続中のセッションの切断
//! - 異常系：存在しないセッションの切断（何もブロードキャストしない）

use std::sync::Arc;

use merlinfest_shared::time::Clock;

use crate::domain::{HubEvent, HubRepository, MessagePusher, SessionId, Timestamp};

use super::{HubEventLoop, error::DisconnectError};

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    repository: Arc<dyn HubRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    event_loop: Arc<HubEventLoop>,
}

impl DisconnectSessionUseCase {
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

    /// セッション切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SessionId>)` - `user-count-update` を通知したセッション
    /// * `Err(DisconnectError)` - 未接続のセッション
    pub async fn execute(&self, session_id: SessionId) -> Result<Vec<SessionId>, DisconnectError> {
        let _turn = self.event_loop.turn().await;

        // 未登録のセッションでも送信チャンネルは必ず解除する
        self.message_pusher.unregister_client(&session_id).await;

        let now = Timestamp::new(self.clock.now_millis());
        let snapshot = self.repository.remove_session(&session_id, now).await?;

        let targets = self.repository.get_all_session_ids().await;
        let count_event = HubEvent::UserCountUpdate {
            count: snapshot.active_users,
        };
        if let Err(e) = self
            .message_pusher
            .broadcast(targets.clone(), &count_event)
            .await
        {
            tracing::warn!("Failed to broadcast user-count-update: {}", e);
        }

        tracing::info!(
            "Session '{}' disconnected ({} active)",
            session_id,
            snapshot.active_users
        );
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::{
        ConnectSessionUseCase,
        test_support::{
            START, clock_at, create_test_message_pusher, create_test_repository, drain,
            event_loop, sid,
        },
    };
    use tokio::sync::mpsc;

    struct Fixture {
        repository: Arc<dyn HubRepository>,
        connect: ConnectSessionUseCase,
        disconnect: DisconnectSessionUseCase,
    }

    fn fixture() -> Fixture {
        let repository: Arc<dyn HubRepository> = create_test_repository();
        let message_pusher: Arc<dyn MessagePusher> = create_test_message_pusher();
        let event_loop = event_loop();
        Fixture {
            connect: ConnectSessionUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock_at(START + 1),
                event_loop.clone(),
            ),
            disconnect: DisconnectSessionUseCase::new(
                repository.clone(),
                message_pusher,
                clock_at(START + 2),
                event_loop,
            ),
            repository,
        }
    }

    #[tokio::test]
    async fn test_disconnect_notifies_remaining_sessions() {
        // テスト項目: 切断すると残りのセッションに新しい人数が通知される
        // given (前提条件):
        let f = fixture();
        let (tx_alice, mut rx_alice) = mpsc::unbounded_channel();
        let (tx_bob, mut rx_bob) = mpsc::unbounded_channel();
        f.connect.execute(sid("alice"), tx_alice).await.unwrap();
        f.connect.execute(sid("bob"), tx_bob).await.unwrap();
        drain(&mut rx_alice);
        drain(&mut rx_bob);

        // when (操作):
        let targets = f.disconnect.execute(sid("bob")).await.unwrap();

        // then (期待する結果):
        assert_eq!(targets, vec![sid("alice")]);
        let frames = drain(&mut rx_alice);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["event"], "user-count-update");
        assert_eq!(frames[0]["data"]["count"], 1);
        assert!(drain(&mut rx_bob).is_empty());
        assert_eq!(f.repository.get_visual_state().await.active_users, 1);
    }

    #[tokio::test]
    async fn test_disconnect_unknown_session_broadcasts_nothing() {
        // テスト項目: 存在しないセッションの切断はエラーになり、何もブロードキャストしない
        // given (前提条件):
        let f = fixture();
        let (tx_alice, mut rx_alice) = mpsc::unbounded_channel();
        f.connect.execute(sid("alice"), tx_alice).await.unwrap();
        drain(&mut rx_alice);

        // when (操作):
        let result = f.disconnect.execute(sid("ghost")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(DisconnectError::SessionNotFound("ghost".to_string()))
        );
        assert!(drain(&mut rx_alice).is_empty());
        assert_eq!(f.repository.get_visual_state().await.active_users, 1);
    }

    #[tokio::test]
    async fn test_last_session_leaving_resets_count_to_zero() {
        // テスト項目: 最後のセッションが切断すると activeUsers は 0 になる
        // given (前提条件):
        let f = fixture();
        let (tx, _rx) = mpsc::unbounded_channel();
        f.connect.execute(sid("alice"), tx).await.unwrap();

        // when (操作):
        let targets = f.disconnect.execute(sid("alice")).await.unwrap();

        // then (期待する結果):
        assert!(targets.is_empty());
        assert_eq!(f.repository.get_visual_state().await.active_users, 0);
    }
}
