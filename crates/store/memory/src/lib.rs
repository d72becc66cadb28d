//! In-memory store backend for Veridoc.
//!
//! Backed by [`dashmap::DashMap`], suitable for tests and single-process
//! deployments. All data is lost on restart.

use async_trait::async_trait;
use dashmap::DashMap;

use veridoc_core::{Document, DocumentId, DocumentStatus, Extraction, Notification, NotificationId, OwnerId};
use veridoc_store::error::StoreError;
use veridoc_store::store::{DocumentStore, NotificationStore};

/// In-memory [`DocumentStore`] and [`NotificationStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DashMap<String, Document>,
    notifications: DashMap<String, Notification>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, document: &Document) -> Result<(), StoreError> {
        match self.documents.entry(document.id.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StoreError::Backend(format!(
                "document {} already exists",
                document.id
            ))),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(document.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.get(id.as_str()).map(|d| d.value().clone()))
    }

    async fn list(&self, owner: Option<&OwnerId>) -> Result<Vec<Document>, StoreError> {
        let mut docs: Vec<Document> = self
            .documents
            .iter()
            .filter(|entry| match owner {
                Some(o) => entry.owner.as_ref() == Some(o),
                None => true,
            })
            .map(|entry| entry.value().clone())
            .collect();
        docs.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(docs)
    }

    async fn complete(
        &self,
        id: &DocumentId,
        status: DocumentStatus,
        extraction: Option<Extraction>,
    ) -> Result<Document, StoreError> {
        if !status.is_terminal() {
            return Err(StoreError::Backend(format!(
                "complete called with non-terminal status {status}"
            )));
        }
        // Entry lock makes the check-then-set atomic per document.
        let mut entry = self
            .documents
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if entry.status.is_terminal() {
            return Err(StoreError::AlreadyTerminal {
                id: id.to_string(),
                current: entry.status.to_string(),
            });
        }
        entry.status = status;
        entry.extraction = extraction;
        Ok(entry.clone())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, notification: &Notification) -> Result<(), StoreError> {
        self.notifications
            .insert(notification.id.to_string(), notification.clone());
        Ok(())
    }

    async fn list(&self, owner: Option<&OwnerId>) -> Result<Vec<Notification>, StoreError> {
        let mut items: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|entry| match owner {
                Some(o) => entry.owner.is_none() || entry.owner.as_ref() == Some(o),
                None => true,
            })
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(items)
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<Notification, StoreError> {
        let mut entry = self
            .notifications
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        entry.read = true;
        Ok(entry.clone())
    }
}
