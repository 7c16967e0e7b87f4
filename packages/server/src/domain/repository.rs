//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    Dj, Interaction, NewDj, NewInteraction, NewVote, RepositoryError, Session, SessionId,
    StoredVisualState, StoredVisualStateInput, Timestamp, User, UserId, VisualState,
    VisualStatePatch, Vote,
};

/// Hub Repository trait
///
/// 共有 `VisualState` と接続中セッションの集合を保持するストアへのインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// 変更系のメソッドは変更後の `VisualState` のスナップショットを返す。
#[async_trait]
pub trait HubRepository: Send + Sync {
    /// 現在の VisualState を取得
    async fn get_visual_state(&self) -> VisualState;

    /// セッションを追加し、activeUsers を更新
    async fn add_session(&self, session: Session) -> Result<VisualState, RepositoryError>;

    /// セッションを削除し、activeUsers を更新
    async fn remove_session(
        &self,
        session_id: &SessionId,
        timestamp: Timestamp,
    ) -> Result<VisualState, RepositoryError>;

    /// 接続中の全てのセッション ID を接続順に取得
    async fn get_all_session_ids(&self) -> Vec<SessionId>;

    /// 接続中のセッション数を取得
    async fn count_sessions(&self) -> usize;

    /// パッチを VisualState にマージ
    async fn apply_patch(&self, patch: VisualStatePatch, timestamp: Timestamp) -> VisualState;

    /// テーマを変更
    async fn change_theme(&self, theme: String, timestamp: Timestamp) -> VisualState;
}

/// Record Repository trait
///
/// フェスティバルの記録（ユーザー、投票、インタラクション、DJ など）を扱う。
#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn insert_user(&self, user: User) -> User;

    async fn list_users(&self) -> Vec<User>;

    /// 投票を記録し、ユーザーの voteCount と lastActive を更新
    ///
    /// ユーザーが存在しない場合は `RepositoryError::UserNotFound`
    async fn insert_vote(&self, vote: NewVote, timestamp: Timestamp)
    -> Result<Vote, RepositoryError>;

    async fn list_votes(&self) -> Vec<Vote>;

    /// インタラクションを記録し、ユーザーの lastActive を更新
    async fn insert_interaction(
        &self,
        interaction: NewInteraction,
        timestamp: Timestamp,
    ) -> Result<Interaction, RepositoryError>;

    async fn list_interactions(&self) -> Vec<Interaction>;

    /// 単一行（id = 1）の VisualState を作成または更新
    async fn upsert_visual_state(
        &self,
        input: StoredVisualStateInput,
        timestamp: Timestamp,
    ) -> StoredVisualState;

    async fn get_visual_state(&self) -> Option<StoredVisualState>;

    async fn insert_dj(&self, dj: NewDj) -> Dj;

    async fn list_djs(&self) -> Vec<Dj>;

    /// ユーザーを ID で検索
    async fn find_user(&self, user_id: &UserId) -> Option<User>;
}
