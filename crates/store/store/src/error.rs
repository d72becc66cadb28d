use thiserror::Error;

/// Errors from document and notification store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("invalid status transition: document {id} is already {current}")]
    AlreadyTerminal { id: String, current: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("backend error: {0}")]
    Backend(String),
}
