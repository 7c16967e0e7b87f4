//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{DomainError, MessagePushError, RepositoryError};

/// セッション接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("session '{0}' is already connected")]
    DuplicateSession(String),

    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ConnectError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Domain(DomainError::DuplicateSession(id)) => {
                ConnectError::DuplicateSession(id)
            }
            other => ConnectError::Repository(other),
        }
    }
}

/// セッション切断のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    #[error("session '{0}' is not connected")]
    SessionNotFound(String),

    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for DisconnectError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Domain(DomainError::SessionNotFound(id)) => {
                DisconnectError::SessionNotFound(id)
            }
            other => DisconnectError::Repository(other),
        }
    }
}

/// ブロードキャストを伴う操作（ビジュアル更新・テーマ変更・エフェクト）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("broadcast failed: {0}")]
    PushFailed(#[from] MessagePushError),
}

/// フェスティバル記録のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

impl From<RepositoryError> for RecordError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::UserNotFound(id) => RecordError::UserNotFound(id),
            RepositoryError::Domain(e) => RecordError::Invalid(e),
        }
    }
}
