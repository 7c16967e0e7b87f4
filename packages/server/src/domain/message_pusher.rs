//! MessagePusher trait 定義
//!
//! セッションへのイベント通知のインターフェース。
//! WebSocket などの具体的な送信手段は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{HubEvent, MessagePushError, SessionId};

/// セッションごとの送信チャンネル（エンコード済みのテキストフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// - `push_to`: 特定のセッションに送信
/// - `broadcast`: 複数セッションに送信（一部の失敗は許容）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// セッションの送信チャンネルを登録
    async fn register_client(&self, session_id: SessionId, sender: PusherChannel);

    /// セッションの送信チャンネルを解除
    async fn unregister_client(&self, session_id: &SessionId);

    /// 特定のセッションにイベントを送信
    async fn push_to(&self, session_id: &SessionId, event: &HubEvent)
    -> Result<(), MessagePushError>;

    /// 複数のセッションにイベントをブロードキャスト
    async fn broadcast(
        &self,
        targets: Vec<SessionId>,
        event: &HubEvent,
    ) -> Result<(), MessagePushError>;
}
