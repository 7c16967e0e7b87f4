//! UseCase: フェスティバル記録（ユーザー・投票・インタラクション・VisualState・DJ）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - 投票・インタラクションが存在するユーザーにだけ紐づくこと
//! - 保存した VisualState がライブの VisualState とは独立していること

use std::sync::Arc;

use merlinfest_shared::time::Clock;

use crate::domain::{
    Dj, Interaction, NewDj, NewInteraction, NewVote, RecordRepository, StoredVisualState,
    StoredVisualStateInput, Timestamp, User, UserId, Vote,
};

use super::error::RecordError;

/// フェスティバル記録のユースケース
pub struct FestivalRecordsUseCase {
    repository: Arc<dyn RecordRepository>,
    clock: Arc<dyn Clock>,
}

impl FestivalRecordsUseCase {
    pub fn new(repository: Arc<dyn RecordRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    /// ユーザーを作成（空白のみのニックネームは未設定として扱う）
    pub async fn create_user(&self, nickname: Option<String>) -> User {
        let nickname = nickname.filter(|n| !n.trim().is_empty());
        let user = User::new(UserId::generate(), nickname, self.now());
        let user = self.repository.insert_user(user).await;
        tracing::info!("User '{}' created", user.id.as_str());
        user
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.repository.list_users().await
    }

    pub async fn cast_vote(&self, vote: NewVote) -> Result<Vote, RecordError> {
        let vote = self.repository.insert_vote(vote, self.now()).await?;
        tracing::info!(
            "User '{}' voted for theme '{}'",
            vote.user_id.as_str(),
            vote.theme
        );
        Ok(vote)
    }

    pub async fn list_votes(&self) -> Vec<Vote> {
        self.repository.list_votes().await
    }

    pub async fn record_interaction(
        &self,
        interaction: NewInteraction,
    ) -> Result<Interaction, RecordError> {
        let interaction = self
            .repository
            .insert_interaction(interaction, self.now())
            .await?;
        Ok(interaction)
    }

    pub async fn list_interactions(&self) -> Vec<Interaction> {
        self.repository.list_interactions().await
    }

    pub async fn save_visual_state(&self, input: StoredVisualStateInput) -> StoredVisualState {
        self.repository.upsert_visual_state(input, self.now()).await
    }

    pub async fn get_saved_visual_state(&self) -> Option<StoredVisualState> {
        self.repository.get_visual_state().await
    }

    pub async fn create_dj(&self, dj: NewDj) -> Dj {
        let dj = self.repository.insert_dj(dj).await;
        tracing::info!("DJ '{}' scheduled", dj.name);
        dj
    }

    pub async fn list_djs(&self) -> Vec<Dj> {
        self.repository.list_djs().await
    }
}
