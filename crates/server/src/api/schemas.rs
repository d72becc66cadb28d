use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status indicator.
    pub status: String,
}

/// Response to a successful upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Always `true` for an accepted upload.
    pub success: bool,
    /// Summary of the accepted file.
    pub file: UploadedFile,
}

/// Identifying details of an accepted upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadedFile {
    /// The generated document id, used to poll for status.
    pub id: String,
    /// Filename as supplied by the uploader.
    #[serde(rename = "originalName")]
    pub original_name: String,
}

/// Error payload returned by all failing endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description of the failure.
    pub error: String,
}
