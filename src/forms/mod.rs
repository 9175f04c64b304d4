//! Form definitions backing the roster routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod roster;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("coordinates must be finite numbers")]
    NonFiniteCoordinate,
}
