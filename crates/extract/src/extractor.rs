use async_trait::async_trait;
use bytes::Bytes;

use veridoc_core::Extraction;

use crate::error::ExtractorError;

/// A document handed to an extractor: raw bytes plus enough context for
/// the provider to interpret them.
#[derive(Debug, Clone)]
pub struct ExtractionInput {
    /// Raw document bytes.
    pub bytes: Bytes,
    /// MIME type as supplied at upload time.
    pub mime_type: String,
    /// Original filename, included in the prompt as a hint.
    pub original_name: String,
}

impl ExtractionInput {
    /// Create a new input.
    pub fn new(
        bytes: Bytes,
        mime_type: impl Into<String>,
        original_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            original_name: original_name.into(),
        }
    }
}

/// Trait for extracting structured compliance data from a document.
#[async_trait]
pub trait Extractor: Send + Sync + std::fmt::Debug {
    /// Run the document through the provider and return whatever structured
    /// fields it produced. Absent fields stay `None`; partial output is a
    /// success, not an error.
    async fn extract(&self, input: &ExtractionInput) -> Result<Extraction, ExtractorError>;
}
