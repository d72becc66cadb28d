use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{DocumentId, NotificationId, OwnerId};

/// Category of an alert record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A tracked document is approaching its expiry date.
    ExpiryWarning,
    /// General informational message.
    SystemInfo,
}

/// An alert shown to the user, independent of document state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,

    /// Alert category.
    pub kind: NotificationKind,

    /// Human-readable message text.
    pub message: String,

    /// Document this alert refers to, if any.
    pub document_id: Option<DocumentId>,

    /// Owner the alert is addressed to, when known.
    pub owner: Option<OwnerId>,

    /// Timestamp when the alert was created.
    pub created_at: DateTime<Utc>,

    /// Read flag. Defaults to unread; flips once via mark-read.
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    /// Create a new unread notification with a generated UUID-v4 id.
    #[must_use]
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(Uuid::new_v4().to_string()),
            kind,
            message: message.into(),
            document_id: None,
            owner: None,
            created_at: Utc::now(),
            read: false,
        }
    }

    /// Link the notification to a document.
    #[must_use]
    pub fn with_document(mut self, document_id: DocumentId) -> Self {
        self.document_id = Some(document_id);
        self
    }

    /// Address the notification to an owner.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<OwnerId>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}
