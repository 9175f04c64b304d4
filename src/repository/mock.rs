//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::makler::{Makler, ReorderPayload};
use crate::repository::errors::RepositoryResult;
use crate::repository::{RosterReader, RosterWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl RosterReader for Repository {
        async fn fetch_roster(&self, token: &str) -> RepositoryResult<Vec<Makler>>;
    }

    #[async_trait]
    impl RosterWriter for Repository {
        async fn submit_positions(
            &self,
            token: &str,
            payload: &ReorderPayload,
        ) -> RepositoryResult<()>;
    }
}
