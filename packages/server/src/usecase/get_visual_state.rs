//! UseCase: 現在の VisualState 取得

use std::sync::Arc;

use crate::domain::{HubRepository, VisualState};

/// 現在の VisualState 取得のユースケース（デバッグ用エンドポイントから使用）
pub struct GetVisualStateUseCase {
    repository: Arc<dyn HubRepository>,
}

impl GetVisualStateUseCase {
    pub fn new(repository: Arc<dyn HubRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> VisualState {
        self.repository.get_visual_state().await
    }
}
