use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extraction::Extraction;
use crate::types::{DocumentId, OwnerId};

/// Processing status of an uploaded document.
///
/// Every document starts `Pending` and transitions exactly once to a
/// terminal state; repeated status reads never observe a regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Uploaded, extraction not yet resolved.
    Pending,
    /// Extraction succeeded; the record carries the extraction payload.
    Processed,
    /// Extraction failed; the record carries no payload.
    Failed,
}

impl DocumentStatus {
    /// Whether this status is terminal (`Processed` or `Failed`).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Processed | Self::Failed)
    }

    /// Return a string representation of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processed => "processed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processed" => Ok(Self::Processed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown document status: {other}")),
        }
    }
}

/// Persisted representation of one uploaded file and its processing outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,

    /// Owner of the document, when the request carried an identity.
    pub owner: Option<OwnerId>,

    /// Filename as supplied by the uploader.
    pub original_name: String,

    /// Key under which the raw bytes live in object storage.
    pub storage_key: String,

    /// MIME type as supplied by the uploader.
    pub mime_type: String,

    /// Timestamp when the upload was accepted.
    pub uploaded_at: DateTime<Utc>,

    /// Current position in the status state machine.
    pub status: DocumentStatus,

    /// Provider extraction payload. Present if and only if the status is
    /// `Processed`.
    pub extraction: Option<Extraction>,
}

impl Document {
    /// Create a new pending document with a generated UUID-v4 id and
    /// `uploaded_at` set to now.
    #[must_use]
    pub fn new(
        original_name: impl Into<String>,
        storage_key: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: DocumentId::new(Uuid::new_v4().to_string()),
            owner: None,
            original_name: original_name.into(),
            storage_key: storage_key.into(),
            mime_type: mime_type.into(),
            uploaded_at: Utc::now(),
            status: DocumentStatus::Pending,
            extraction: None,
        }
    }

    /// Attach an owner identifier.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<OwnerId>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_is_pending() {
        let doc = Document::new("card.jpg", "uploads/1-card.jpg", "image/jpeg");
        assert_eq!(doc.status, DocumentStatus::Pending);
        assert!(doc.extraction.is_none());
        assert!(doc.owner.is_none());
        assert_eq!(doc.original_name, "card.jpg");
    }

    #[test]
    fn with_owner_sets_owner() {
        let doc = Document::new("a.pdf", "uploads/2-a.pdf", "application/pdf").with_owner("user-1");
        assert_eq!(doc.owner.as_ref().map(OwnerId::as_str), Some("user-1"));
    }

    #[test]
    fn status_terminality() {
        assert!(!DocumentStatus::Pending.is_terminal());
        assert!(DocumentStatus::Processed.is_terminal());
        assert!(DocumentStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DocumentStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&DocumentStatus::Processed).unwrap(),
            "\"processed\""
        );
        assert_eq!(
            serde_json::to_string(&DocumentStatus::Failed).unwrap(),
            "\"failed\""
        );
    }

    #[test]
    fn document_serde_roundtrip() {
        let doc = Document::new("b.png", "uploads/3-b.png", "image/png").with_owner("user-2");
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, doc.id);
        assert_eq!(back.status, DocumentStatus::Pending);
        assert_eq!(back.storage_key, doc.storage_key);
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = Document::new("x", "k1", "image/png");
        let b = Document::new("x", "k2", "image/png");
        assert_ne!(a.id, b.id);
    }
}
