use thiserror::Error;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// An error occurred in the document or notification store.
    #[error("store error: {0}")]
    Store(#[from] veridoc_store::StoreError),

    /// An error occurred in object storage.
    #[error("storage error: {0}")]
    Blob(#[from] veridoc_blob::BlobError),

    /// An error from the extraction provider.
    #[error("extraction error: {0}")]
    Extractor(#[from] veridoc_extract::ExtractorError),

    /// The upload was rejected before being accepted.
    #[error("invalid upload: {0}")]
    InvalidInput(String),

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The workflow was misconfigured (e.g. missing required components).
    #[error("configuration error: {0}")]
    Configuration(String),
}
