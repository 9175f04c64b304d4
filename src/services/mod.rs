//! Roster workflows sitting between the HTTP layer and the roster service.

use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub mod persistence;
pub mod roster;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("authentication token is missing")]
    AuthMissing,

    #[error("failed to load brokers: {0}")]
    Load(String),

    #[error("positions rejected: {0}")]
    SaveValidation(String),

    #[error("failed to save positions: {0}")]
    SaveTransport(String),

    #[error("a save is already in progress")]
    Busy,

    #[error("{0}")]
    Form(String),

    #[error("roster controller is closed")]
    Closed,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Maps a failed roster fetch.
    pub fn from_load(err: RepositoryError) -> Self {
        match err {
            RepositoryError::AuthMissing => ServiceError::AuthMissing,
            other => ServiceError::Load(other.to_string()),
        }
    }

    /// Maps a failed reorder submit.
    pub fn from_save(err: RepositoryError) -> Self {
        match err {
            RepositoryError::AuthMissing => ServiceError::AuthMissing,
            RepositoryError::ValidationError(detail) => ServiceError::SaveValidation(detail),
            other => ServiceError::SaveTransport(other.to_string()),
        }
    }
}
