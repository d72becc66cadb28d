use thiserror::Error;

/// Errors that can occur during document extraction.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("extraction request timed out after {0}s")]
    Timeout(u64),

    /// Failed to parse the model response.
    #[error("failed to parse extraction response: {0}")]
    ParseError(String),

    /// The provider API returned an error response.
    #[error("extraction API error: {0}")]
    ApiError(String),

    /// The document format cannot be sent to the provider.
    #[error("unsupported document type: {0}")]
    UnsupportedMediaType(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ExtractorError {
    /// Whether retrying the extraction could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::HttpError(_) | Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_retryable() {
        assert!(ExtractorError::HttpError("reset".into()).is_retryable());
        assert!(ExtractorError::Timeout(60).is_retryable());
    }

    #[test]
    fn semantic_errors_are_not_retryable() {
        assert!(!ExtractorError::ParseError("bad json".into()).is_retryable());
        assert!(!ExtractorError::UnsupportedMediaType("text/csv".into()).is_retryable());
    }
}
