use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use veridoc_workflow::WorkflowError;

/// Errors that can occur when running the Veridoc server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A workflow-level error surfaced through the API.
    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// The upload request carried no file part.
    #[error("No file uploaded")]
    NoFileUploaded,

    /// The multipart body could not be read.
    #[error("invalid upload body: {0}")]
    InvalidUpload(String),

    /// The requested record does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NoFileUploaded => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::InvalidUpload(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Workflow(WorkflowError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::Workflow(WorkflowError::NotFound(msg)) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Workflow(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Self::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
