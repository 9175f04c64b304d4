use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Authentication token is missing")]
    AuthMissing,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unexpected status: {0}")]
    UnexpectedStatus(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return RepositoryError::MalformedResponse(err.to_string());
        }
        if let Some(status) = err.status() {
            return RepositoryError::UnexpectedStatus(status.as_u16());
        }
        if err.is_timeout() || err.is_connect() || err.is_request() {
            return RepositoryError::ConnectionError(err.to_string());
        }
        RepositoryError::Unexpected(format!("Unexpected http error: {err}"))
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::MalformedResponse(err.to_string())
    }
}
