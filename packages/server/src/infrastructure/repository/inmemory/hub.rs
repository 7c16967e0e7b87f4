//! InMemory Hub Repository 実装
//!
//! ドメイン層が定義する HubRepository trait の具体的な実装。
//! `HubState` 集約を `tokio::sync::Mutex` の内側に保持し、
//! 全ての変更をロックを取った状態で完了させます。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    HubRepository, HubState, RepositoryError, Session, SessionId, Timestamp, VisualState,
    VisualStatePatch,
};

/// インメモリ Hub Repository 実装
pub struct InMemoryHubRepository {
    /// Hub 集約（VisualState と接続中セッション）
    hub: Arc<Mutex<HubState>>,
}

impl InMemoryHubRepository {
    /// 新しい InMemoryHubRepository を作成
    pub fn new(hub: Arc<Mutex<HubState>>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl HubRepository for InMemoryHubRepository {
    async fn get_visual_state(&self) -> VisualState {
        let hub = self.hub.lock().await;
        hub.visual_state.clone()
    }

    async fn add_session(&self, session: Session) -> Result<VisualState, RepositoryError> {
        let mut hub = self.hub.lock().await;
        hub.add_session(session)?;
        Ok(hub.visual_state.clone())
    }

    async fn remove_session(
        &self,
        session_id: &SessionId,
        timestamp: Timestamp,
    ) -> Result<VisualState, RepositoryError> {
        let mut hub = self.hub.lock().await;
        hub.remove_session(session_id, timestamp)?;
        Ok(hub.visual_state.clone())
    }

    async fn get_all_session_ids(&self) -> Vec<SessionId> {
        let hub = self.hub.lock().await;
        hub.session_ids()
    }

    async fn count_sessions(&self) -> usize {
        let hub = self.hub.lock().await;
        hub.sessions.len()
    }

    async fn apply_patch(&self, patch: VisualStatePatch, timestamp: Timestamp) -> VisualState {
        let mut hub = self.hub.lock().await;
        hub.visual_state.apply_patch(patch, timestamp);
        hub.visual_state.clone()
    }

    async fn change_theme(&self, theme: String, timestamp: Timestamp) -> VisualState {
        let mut hub = self.hub.lock().await;
        hub.visual_state.set_theme(theme, timestamp);
        hub.visual_state.clone()
    }
}
