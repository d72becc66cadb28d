use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info, instrument, warn};

use veridoc_blob::BlobError;
use veridoc_blob::store::BlobStore;
use veridoc_core::{Document, DocumentId, DocumentStatus, Extraction, Notification, NotificationId, NotificationKind, OwnerId};
use veridoc_extract::extractor::{ExtractionInput, Extractor};
use veridoc_store::error::StoreError;
use veridoc_store::store::{DocumentStore, NotificationStore};

use crate::error::WorkflowError;
use crate::metrics::{MetricsSnapshot, WorkflowMetrics};

/// Retry behaviour for transient extraction errors.
///
/// The default runs a single attempt; retries only make sense against
/// providers whose failures are dominated by transient transport errors.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles per attempt after that.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::from_millis(500),
        }
    }
}

/// An upload accepted from a client, before any record exists for it.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Raw file bytes.
    pub bytes: Bytes,
    /// Filename as supplied by the uploader.
    pub original_name: String,
    /// MIME type as supplied by the uploader.
    pub mime_type: String,
    /// Owner extracted from the request, when present.
    pub owner: Option<OwnerId>,
}

/// Build the object storage key for an upload.
///
/// Keys are `uploads/{unix_millis}-{name}` with runs of whitespace in the
/// name collapsed to single dashes, so keys stay URL-safe.
pub(crate) fn storage_key(now_ms: i64, original_name: &str) -> String {
    let sanitized = original_name.split_whitespace().collect::<Vec<_>>().join("-");
    format!("uploads/{now_ms}-{sanitized}")
}

/// The document intake and extraction workflow.
///
/// Owns the stores, the object storage backend, and the extractor, and
/// drives every document through the pending-to-terminal lifecycle. Uploads
/// are accepted synchronously; extraction runs in a spawned task so the
/// upload response never waits on the provider.
pub struct DocumentWorkflow {
    pub(crate) documents: Arc<dyn DocumentStore>,
    pub(crate) notifications: Arc<dyn NotificationStore>,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) extractor: Arc<dyn Extractor>,
    pub(crate) metrics: Arc<WorkflowMetrics>,
    pub(crate) retry: RetryPolicy,
    pub(crate) expiry_warning_days: i64,
    pub(crate) download_url_ttl: Duration,
}

impl std::fmt::Debug for DocumentWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentWorkflow")
            .field("retry", &self.retry)
            .field("expiry_warning_days", &self.expiry_warning_days)
            .field("download_url_ttl", &self.download_url_ttl)
            .finish_non_exhaustive()
    }
}

impl DocumentWorkflow {
    /// Accept an upload: store the bytes, create a pending record, and
    /// kick off extraction in the background.
    ///
    /// Returns the pending document immediately; clients observe the
    /// outcome by polling [`get_document`](Self::get_document).
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidInput`] for an empty file or filename,
    /// and propagates storage errors. Extraction errors never surface here.
    #[instrument(skip(self, upload), fields(name = %upload.original_name, size = upload.bytes.len()))]
    pub async fn submit(self: &Arc<Self>, upload: UploadRequest) -> Result<Document, WorkflowError> {
        if upload.original_name.trim().is_empty() {
            return Err(WorkflowError::InvalidInput("filename is empty".to_owned()));
        }
        if upload.bytes.is_empty() {
            return Err(WorkflowError::InvalidInput("file is empty".to_owned()));
        }

        let key = storage_key(Utc::now().timestamp_millis(), &upload.original_name);
        self.blobs
            .put(&key, upload.bytes.clone(), &upload.mime_type)
            .await?;

        let mut document = Document::new(&upload.original_name, &key, &upload.mime_type);
        if let Some(owner) = upload.owner {
            document = document.with_owner(owner);
        }
        self.documents.create(&document).await?;
        self.metrics.increment_uploads();

        info!(document_id = %document.id, key = %key, "upload accepted, extraction queued");

        let workflow = Arc::clone(self);
        let spawned = document.clone();
        tokio::spawn(async move {
            workflow.process_extraction(&spawned).await;
        });

        Ok(document)
    }

    /// Run extraction for a pending document and apply its terminal
    /// transition.
    ///
    /// Every path out of this function leaves the document terminal, except
    /// when another worker already claimed the transition, in which case the
    /// result is dropped and the stored status stands.
    #[instrument(skip(self, document), fields(document_id = %document.id))]
    pub async fn process_extraction(&self, document: &Document) {
        match self.run_extraction(document).await {
            Ok(extraction) => {
                match self
                    .documents
                    .complete(&document.id, DocumentStatus::Processed, Some(extraction.clone()))
                    .await
                {
                    Ok(_) => {
                        self.metrics.increment_processed();
                        info!("document processed");
                        self.maybe_warn_expiry(document, &extraction).await;
                    }
                    Err(StoreError::AlreadyTerminal { current, .. }) => {
                        debug!(current = %current, "document already terminal, dropping extraction result");
                    }
                    Err(e) => error!(error = %e, "failed to record extraction result"),
                }
            }
            Err(e) => {
                warn!(error = %e, "extraction failed");
                match self
                    .documents
                    .complete(&document.id, DocumentStatus::Failed, None)
                    .await
                {
                    Ok(_) => self.metrics.increment_failed(),
                    Err(StoreError::AlreadyTerminal { current, .. }) => {
                        debug!(current = %current, "document already terminal");
                    }
                    Err(e) => error!(error = %e, "failed to record extraction failure"),
                }
            }
        }
    }

    /// Fetch the document bytes and run the extractor, retrying transient
    /// errors per the configured [`RetryPolicy`].
    async fn run_extraction(&self, document: &Document) -> Result<Extraction, WorkflowError> {
        let bytes = self.blobs.get(&document.storage_key).await?;
        let input = ExtractionInput::new(bytes, &document.mime_type, &document.original_name);

        let mut attempt = 1;
        let mut backoff = self.retry.backoff;
        loop {
            match self.extractor.extract(&input).await {
                Ok(extraction) => return Ok(extraction),
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    attempt += 1;
                    self.metrics.increment_retries();
                    warn!(error = %e, attempt, "transient extraction error, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Create an expiry warning if the extraction carries an expiry date
    /// inside the warning window (or already in the past).
    async fn maybe_warn_expiry(&self, document: &Document, extraction: &Extraction) {
        if self.expiry_warning_days <= 0 {
            return;
        }
        let Some(date_str) = extraction.expiry_date.as_deref() else {
            return;
        };
        let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") else {
            debug!(expiry_date = %date_str, "unparseable expiry date, skipping warning");
            return;
        };

        let label = extraction.doc_type.as_deref().unwrap_or("document");
        let days = (date - Utc::now().date_naive()).num_days();
        let message = if days < 0 {
            format!("Your {label} expired on {date_str}")
        } else if days <= self.expiry_warning_days {
            format!("Your {label} expires in {days} days ({date_str})")
        } else {
            return;
        };

        let mut notification = Notification::new(NotificationKind::ExpiryWarning, message)
            .with_document(document.id.clone());
        if let Some(owner) = &document.owner {
            notification = notification.with_owner(owner.clone());
        }

        if let Err(e) = self.notifications.create(&notification).await {
            error!(error = %e, "failed to create expiry warning");
        } else {
            self.metrics.increment_expiry_warnings();
        }
    }

    /// Fetch a document by id.
    ///
    /// # Errors
    ///
    /// Propagates store errors; a missing document is `Ok(None)`.
    pub async fn get_document(&self, id: &DocumentId) -> Result<Option<Document>, WorkflowError> {
        Ok(self.documents.get(id).await?)
    }

    /// List documents, newest upload first, optionally scoped to an owner.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub async fn list_documents(
        &self,
        owner: Option<&OwnerId>,
    ) -> Result<Vec<Document>, WorkflowError> {
        Ok(self.documents.list(owner).await?)
    }

    /// List notifications, newest first, optionally scoped to an owner.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub async fn list_notifications(
        &self,
        owner: Option<&OwnerId>,
    ) -> Result<Vec<Notification>, WorkflowError> {
        Ok(self.notifications.list(owner).await?)
    }

    /// Mark a notification as read.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NotFound`] for an unknown id.
    pub async fn mark_notification_read(
        &self,
        id: &NotificationId,
    ) -> Result<Notification, WorkflowError> {
        self.notifications.mark_read(id).await.map_err(|e| match e {
            StoreError::NotFound(id) => WorkflowError::NotFound(id),
            e => e.into(),
        })
    }

    /// Produce a time-limited download URL for a stored object.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NotFound`] if no object exists under the key.
    pub async fn download_url(&self, key: &str) -> Result<String, WorkflowError> {
        self.blobs
            .presign_get(key, self.download_url_ttl)
            .await
            .map_err(|e| match e {
                BlobError::NotFound(key) => WorkflowError::NotFound(key),
                e => e.into(),
            })
    }

    /// Take a snapshot of the workflow counters.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
