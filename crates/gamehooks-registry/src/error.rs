//! Registry error types.

use thiserror::Error;
use uuid::Uuid;

/// Registry error types.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Supplied event patterns were rejected.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No endpoint with the given id.
    #[error("The endpoint with id {0} does not exist")]
    NotFound(Uuid),

    /// Reading or writing the endpoint document failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] std::io::Error),

    /// The endpoint document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP client could not be built.
    #[error("Dispatcher error: {0}")]
    Dispatcher(String),
}

impl RegistryError {
    /// Whether the caller can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}
