//! UseCase: セッション接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::execute() メソッド
//! - initial-state は新しいセッションだけに、user-count-update は全員に届くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規セッションの接続
//! - 異常系：同じ session id での二重接続

use std::sync::Arc;

use merlinfest_shared::time::Clock;

use crate::domain::{
    HubEvent, HubRepository, MessagePusher, PusherChannel, Session, SessionId, Timestamp,
    VisualState,
};

use super::{HubEventLoop, error::ConnectError};

/// セッション接続のユースケース
pub struct ConnectSessionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn HubRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    event_loop: Arc<HubEventLoop>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
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

    /// セッション接続を実行
    ///
    /// 1. セッションを追加して activeUsers を更新
    /// 2. MessagePusher に送信チャンネルを登録
    /// 3. 新しいセッションに `initial-state` を送信
    /// 4. 全セッション（新しいセッションを含む）に `user-count-update` をブロードキャスト
    ///
    /// # Returns
    ///
    /// * `Ok(VisualState)` - 新しいセッションに送ったスナップショット
    /// * `Err(ConnectError)` - 接続失敗（チャンネルは登録されない）
    pub async fn execute(
        &self,
        session_id: SessionId,
        sender: PusherChannel,
    ) -> Result<VisualState, ConnectError> {
        let _turn = self.event_loop.turn().await;

        let connected_at = Timestamp::new(self.clock.now_millis());
        let snapshot = self
            .repository
            .add_session(Session::new(session_id.clone(), connected_at))
            .await?;

        self.message_pusher
            .register_client(session_id.clone(), sender)
            .await;

        if let Err(e) = self
            .message_pusher
            .push_to(&session_id, &HubEvent::InitialState(snapshot.clone()))
            .await
        {
            tracing::warn!("Failed to send initial-state to '{}': {}", session_id, e);
        }

        let targets = self.repository.get_all_session_ids().await;
        let count_event = HubEvent::UserCountUpdate {
            count: snapshot.active_users,
        };
        if let Err(e) = self.message_pusher.broadcast(targets, &count_event).await {
            tracing::warn!("Failed to broadcast user-count-update: {}", e);
        }

        tracing::info!(
            "Session '{}' connected ({} active)",
            session_id,
            snapshot.active_users
        );
        Ok(snapshot)
    }
}
