use serde::{Deserialize, Serialize};

/// Structured fields returned by the external vision/LLM provider.
///
/// The payload is persisted verbatim: field names match what the provider
/// returns, absent fields stay absent, and no value (including the expiry
/// date string) is validated or reformatted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Document type as identified by the provider (e.g. "Driver License").
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,

    /// Expiry date as a raw string, typically `YYYY-MM-DD`. Not validated.
    ///
    /// The provider emits `expiryDate`; persisted and API output use
    /// snake_case like every other record field.
    #[serde(alias = "expiryDate", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    /// License or certificate number. Accepted as `licenseNumber` from the
    /// provider.
    #[serde(alias = "licenseNumber", skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,

    /// Name of the license holder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Provider confidence score in `0.0..=1.0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Brief summary of the document content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Extraction {
    /// Set the document type.
    #[must_use]
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Set the expiry date string.
    #[must_use]
    pub fn with_expiry_date(mut self, expiry_date: impl Into<String>) -> Self {
        self.expiry_date = Some(expiry_date.into());
        self
    }

    /// Set the license number.
    #[must_use]
    pub fn with_license_number(mut self, license_number: impl Into<String>) -> Self {
        self.license_number = Some(license_number.into());
        self
    }

    /// Set the holder name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the confidence score.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Set the content summary.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}
