use async_trait::async_trait;

use crate::{
    domain::makler::{Makler, ReorderPayload},
    repository::errors::RepositoryResult,
};

pub mod errors;
pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

pub use http::HttpRosterRepository;

/// Read-only source of the bearer token presented to the roster service.
///
/// Consulted before every request; `None` means the operator has to sign in
/// again.
pub trait CredentialProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

impl<F> CredentialProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Token fixed at startup, usually taken from configuration.
#[derive(Clone, Debug, Default)]
pub struct StaticCredentials {
    token: Option<String>,
}

impl StaticCredentials {
    pub fn new(token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self { token }
    }
}

impl CredentialProvider for StaticCredentials {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }
}

#[async_trait]
pub trait RosterReader {
    /// Returns the full broker collection in server order. Not deduplicated.
    async fn fetch_roster(&self, token: &str) -> RepositoryResult<Vec<Makler>>;
}

#[async_trait]
pub trait RosterWriter {
    async fn submit_positions(&self, token: &str, payload: &ReorderPayload)
    -> RepositoryResult<()>;
}
