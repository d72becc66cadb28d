use async_trait::async_trait;

use veridoc_core::{Document, DocumentId, DocumentStatus, Extraction, Notification, NotificationId, OwnerId};

use crate::error::StoreError;

/// Trait for persisting document records.
///
/// Implementations must be `Send + Sync` and safe for concurrent access.
/// The store is the single authority on status transitions: a document is
/// created `pending` and moves to a terminal status exactly once, through
/// [`complete`](DocumentStore::complete).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document record.
    ///
    /// The record is stored as given; callers construct it with
    /// [`Document::new`], which starts it in `pending` status.
    async fn create(&self, document: &Document) -> Result<(), StoreError>;

    /// Fetch a document by id. Returns `None` if no such record exists.
    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, StoreError>;

    /// List documents, newest upload first.
    ///
    /// When `owner` is given, only that owner's documents are returned.
    async fn list(&self, owner: Option<&OwnerId>) -> Result<Vec<Document>, StoreError>;

    /// Apply the single pending-to-terminal transition for a document.
    ///
    /// Sets the document's status to `status` (which must be terminal) and
    /// records the extraction result, if any. Returns the updated record.
    ///
    /// Fails with [`StoreError::AlreadyTerminal`] if the document has already
    /// left `pending`, and with [`StoreError::NotFound`] if the id is unknown.
    /// Passing a non-terminal `status` is a caller bug and is rejected as a
    /// backend error.
    async fn complete(
        &self,
        id: &DocumentId,
        status: DocumentStatus,
        extraction: Option<Extraction>,
    ) -> Result<Document, StoreError>;
}

/// Trait for persisting user notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a new notification.
    async fn create(&self, notification: &Notification) -> Result<(), StoreError>;

    /// List notifications, newest first.
    ///
    /// When `owner` is given, only notifications addressed to that owner
    /// (or to nobody in particular) are returned.
    async fn list(&self, owner: Option<&OwnerId>) -> Result<Vec<Notification>, StoreError>;

    /// Mark a notification as read. Idempotent: marking an already-read
    /// notification succeeds and returns the unchanged record.
    async fn mark_read(&self, id: &NotificationId) -> Result<Notification, StoreError>;
}
