//! InMemory Record Repository 実装
//!
//! フェスティバルの記録を Vec のテーブルとして保持します。
//! id は各テーブルで 1 から連番で払い出します。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Dj, Interaction, NewDj, NewInteraction, NewVote, RecordRepository, RepositoryError,
    StoredVisualState, StoredVisualStateInput, Timestamp, User, UserId, Vote,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    votes: Vec<Vote>,
    interactions: Vec<Interaction>,
    visual_state: Option<StoredVisualState>,
    djs: Vec<Dj>,
    next_vote_id: u64,
    next_interaction_id: u64,
    next_dj_id: u64,
}

impl Tables {
    fn user_mut(&mut self, user_id: &UserId) -> Result<&mut User, RepositoryError> {
        self.users
            .iter_mut()
            .find(|user| &user.id == user_id)
            .ok_or_else(|| RepositoryError::UserNotFound(user_id.as_str().to_string()))
    }
}

fn next_id(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

/// インメモリ Record Repository 実装
#[derive(Default)]
pub struct InMemoryRecordRepository {
    tables: Mutex<Tables>,
}

impl InMemoryRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn insert_user(&self, user: User) -> User {
        let mut tables = self.tables.lock().await;
        tables.users.push(user.clone());
        user
    }

    async fn list_users(&self) -> Vec<User> {
        self.tables.lock().await.users.clone()
    }

    async fn insert_vote(
        &self,
        vote: NewVote,
        timestamp: Timestamp,
    ) -> Result<Vote, RepositoryError> {
        let mut tables = self.tables.lock().await;
        tables.user_mut(&vote.user_id)?.record_vote(timestamp);

        let vote = Vote {
            id: next_id(&mut tables.next_vote_id),
            user_id: vote.user_id,
            theme: vote.theme,
            created_at: timestamp,
        };
        tables.votes.push(vote.clone());
        Ok(vote)
    }

    async fn list_votes(&self) -> Vec<Vote> {
        self.tables.lock().await.votes.clone()
    }

    async fn insert_interaction(
        &self,
        interaction: NewInteraction,
        timestamp: Timestamp,
    ) -> Result<Interaction, RepositoryError> {
        let mut tables = self.tables.lock().await;
        tables.user_mut(&interaction.user_id)?.mark_active(timestamp);

        let interaction = Interaction {
            id: next_id(&mut tables.next_interaction_id),
            user_id: interaction.user_id,
            action_type: interaction.action_type,
            details: interaction.details,
            created_at: timestamp,
        };
        tables.interactions.push(interaction.clone());
        Ok(interaction)
    }

    async fn list_interactions(&self) -> Vec<Interaction> {
        self.tables.lock().await.interactions.clone()
    }

    async fn upsert_visual_state(
        &self,
        input: StoredVisualStateInput,
        timestamp: Timestamp,
    ) -> StoredVisualState {
        let mut tables = self.tables.lock().await;
        let stored = StoredVisualState::from_input(input, timestamp);
        tables.visual_state = Some(stored.clone());
        stored
    }

    async fn get_visual_state(&self) -> Option<StoredVisualState> {
        self.tables.lock().await.visual_state.clone()
    }

    async fn insert_dj(&self, dj: NewDj) -> Dj {
        let mut tables = self.tables.lock().await;
        let dj = Dj {
            id: next_id(&mut tables.next_dj_id),
            name: dj.name,
            set_start: dj.set_start,
            set_end: dj.set_end,
            visual_preset: dj.visual_preset,
        };
        tables.djs.push(dj.clone());
        dj
    }

    async fn list_djs(&self) -> Vec<Dj> {
        self.tables.lock().await.djs.clone()
    }

    async fn find_user(&self, user_id: &UserId) -> Option<User> {
        let tables = self.tables.lock().await;
        tables.users.iter().find(|user| &user.id == user_id).cloned()
    }
}
