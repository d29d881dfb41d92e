//! Error types for the reordering core.

use thiserror::Error;

/// Result type for reordering operations.
pub type SortResult<T> = Result<T, SortError>;

/// Errors that can occur while reading or rewriting sort orders.
#[derive(Debug, Error)]
pub enum SortError {
    /// The client's ordered ids disagree with the stored snapshot
    /// (stale view, concurrent deletion, filter drift).
    #[error("input mismatch: {0}")]
    InputMismatch(String),

    /// Content type or entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A required parameter is missing or malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure reported by the persistence collaborator.
    #[error("store error: {0}")]
    Store(String),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SortError {
    /// HTTP status the error maps to at the request boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Serialization(_) => 400,
            Self::NotFound(_) => 404,
            Self::InputMismatch(_) => 409,
            Self::Store(_) | Self::Config(_) => 500,
        }
    }

    /// Short error name reported to clients.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InputMismatch(_) => "InputMismatchError",
            Self::NotFound(_) => "NotFoundError",
            Self::Validation(_) | Self::Serialization(_) => "ValidationError",
            Self::Store(_) | Self::Config(_) => "InternalServerError",
        }
    }

    /// Whether the error is the caller's fault rather than ours.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
