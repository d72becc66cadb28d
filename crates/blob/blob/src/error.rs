use thiserror::Error;

/// Errors from object storage operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// No object exists under the requested key.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The storage service rejected the request.
    #[error("storage service error: {0}")]
    Service(String),

    /// A network or connection error occurred reaching the storage service.
    #[error("storage connection error: {0}")]
    Connection(String),

    /// The request timed out.
    #[error("storage request timed out")]
    Timeout,

    /// The object key is malformed.
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    /// Configuration is invalid.
    #[error("invalid storage configuration: {0}")]
    Configuration(String),
}

impl BlobError {
    /// Whether retrying the operation could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }
}
