use async_trait::async_trait;

use veridoc_core::Extraction;

use crate::error::ExtractorError;
use crate::extractor::{ExtractionInput, Extractor};

/// A mock extractor that returns a configurable result.
#[derive(Debug, Clone)]
pub struct MockExtractor {
    extraction: Extraction,
}

impl MockExtractor {
    /// Create a mock returning an empty extraction.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            extraction: Extraction::default(),
        }
    }

    /// Create a mock with a fixed extraction result.
    #[must_use]
    pub fn with_extraction(extraction: Extraction) -> Self {
        Self { extraction }
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn extract(&self, _input: &ExtractionInput) -> Result<Extraction, ExtractorError> {
        Ok(self.extraction.clone())
    }
}

/// An extractor that always fails, for exercising failure paths.
#[derive(Debug, Clone)]
pub struct FailingExtractor {
    error_message: String,
}

impl FailingExtractor {
    /// Create a failing extractor with the given error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error_message: message.into(),
        }
    }
}

#[async_trait]
impl Extractor for FailingExtractor {
    async fn extract(&self, _input: &ExtractionInput) -> Result<Extraction, ExtractorError> {
        Err(ExtractorError::ApiError(self.error_message.clone()))
    }
}
