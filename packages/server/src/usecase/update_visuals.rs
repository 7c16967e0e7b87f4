//! UseCase: ビジュアル更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateVisualsUseCase::execute() メソッド
//! - パッチがマージされ、送信者以外の全員に `visual-update` がブロードキャストされること
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数セッション接続中のパッチ送信
//! - エッジケース：送信者のみが接続している場合（ブロードキャスト対象なし）

use std::sync::Arc;

use merlinfest_shared::time::Clock;

use crate::domain::{
    HubEvent, HubRepository, MessagePusher, SessionId, Timestamp, VisualStatePatch,
};

use super::{HubEventLoop, error::BroadcastError};

/// ビジュアル更新のユースケース
pub struct UpdateVisualsUseCase {
    repository: Arc<dyn HubRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    event_loop: Arc<HubEventLoop>,
}

impl UpdateVisualsUseCase {
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

    /// パッチをマージし、送信者以外に新しい VisualState をブロードキャスト
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SessionId>)` - ブロードキャスト対象のセッション
    /// * `Err(BroadcastError)` - ブロードキャスト失敗（状態は更新済み）
    pub async fn execute(
        &self,
        from: &SessionId,
        patch: VisualStatePatch,
    ) -> Result<Vec<SessionId>, BroadcastError> {
        let _turn = self.event_loop.turn().await;

        let now = Timestamp::new(self.clock.now_millis());
        let state = self.repository.apply_patch(patch, now).await;

        let targets: Vec<SessionId> = self
            .repository
            .get_all_session_ids()
            .await
            .into_iter()
            .filter(|id| id != from)
            .collect();

        self.message_pusher
            .broadcast(targets.clone(), &HubEvent::VisualUpdate(state))
            .await?;

        tracing::debug!(
            "Visual update from '{}' relayed to {} sessions",
            from,
            targets.len()
        );
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessagePushError, MockMessagePusher, ParametersPatch, Session},
        usecase::test_support::{START, clock_at, create_test_repository, event_loop, sid},
    };

    async fn connect_all(repository: &Arc<dyn HubRepository>, ids: &[&str]) {
        for id in ids {
            repository
                .add_session(Session::new(sid(id), Timestamp::new(START)))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_update_visuals_broadcasts_to_everyone_but_sender() {
        // テスト項目: パッチはマージされ、送信者以外に visual-update がブロードキャストされる
        // given (前提条件):
        let repository: Arc<dyn HubRepository> = create_test_repository();
        connect_all(&repository, &["alice", "bob", "charlie"]).await;

        let mut message_pusher = MockMessagePusher::new();
        message_pusher
            .expect_broadcast()
            .withf(|targets, event| {
                let HubEvent::VisualUpdate(state) = event else {
                    return false;
                };
                targets == &vec![sid("bob"), sid("charlie")]
                    && state.parameters.speed == 80.0
                    && state.parameters.intensity == 50.0
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = UpdateVisualsUseCase::new(
            repository.clone(),
            Arc::new(message_pusher),
            clock_at(START + 100),
            event_loop(),
        );
        let patch = VisualStatePatch::parameters(ParametersPatch {
            speed: Some(80.0),
            ..Default::default()
        });

        // when (操作):
        let result = usecase.execute(&sid("alice"), patch).await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![sid("bob"), sid("charlie")]));
        let state = repository.get_visual_state().await;
        assert_eq!(state.parameters.speed, 80.0);
        assert_eq!(state.last_updated, Timestamp::new(START + 100));
    }

    #[tokio::test]
    async fn test_update_visuals_with_only_sender_connected() {
        // テスト項目: 送信者しかいない場合、ブロードキャスト対象は空になる
        // given (前提条件):
        let repository: Arc<dyn HubRepository> = create_test_repository();
        connect_all(&repository, &["alice"]).await;

        let mut message_pusher = MockMessagePusher::new();
        message_pusher
            .expect_broadcast()
            .withf(|targets, _| targets.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = UpdateVisualsUseCase::new(
            repository.clone(),
            Arc::new(message_pusher),
            clock_at(START + 100),
            event_loop(),
        );

        // when (操作):
        let result = usecase
            .execute(&sid("alice"), VisualStatePatch::theme("cosmic"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![]));
        assert_eq!(repository.get_visual_state().await.active_theme, "cosmic");
    }

    #[tokio::test]
    async fn test_update_visuals_reports_broadcast_failure() {
        // テスト項目: ブロードキャストに失敗するとエラーが返るが、状態は更新済み
        // given (前提条件):
        let repository: Arc<dyn HubRepository> = create_test_repository();
        connect_all(&repository, &["alice", "bob"]).await;

        let mut message_pusher = MockMessagePusher::new();
        message_pusher
            .expect_broadcast()
            .returning(|_, _| Err(MessagePushError::EncodeFailed("boom".to_string())));

        let usecase = UpdateVisualsUseCase::new(
            repository.clone(),
            Arc::new(message_pusher),
            clock_at(START + 100),
            event_loop(),
        );

        // when (操作):
        let result = usecase
            .execute(&sid("alice"), VisualStatePatch::theme("storm"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(BroadcastError::PushFailed(MessagePushError::EncodeFailed(
                "boom".to_string()
            )))
        );
        assert_eq!(repository.get_visual_state().await.active_theme, "storm");
    }
}
