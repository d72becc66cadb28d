use std::sync::Arc;
use std::time::Duration;

use veridoc_blob::store::BlobStore;
use veridoc_extract::extractor::Extractor;
use veridoc_store::store::{DocumentStore, NotificationStore};

use crate::error::WorkflowError;
use crate::metrics::WorkflowMetrics;
use crate::workflow::{DocumentWorkflow, RetryPolicy};

/// Fluent builder for constructing a [`DocumentWorkflow`].
///
/// The document store, notification store, blob store, and extractor must
/// all be supplied. Everything else has sensible defaults: no retries, a
/// 30-day expiry warning window, and one-hour download URLs.
pub struct WorkflowBuilder {
    documents: Option<Arc<dyn DocumentStore>>,
    notifications: Option<Arc<dyn NotificationStore>>,
    blobs: Option<Arc<dyn BlobStore>>,
    extractor: Option<Arc<dyn Extractor>>,
    metrics: Arc<WorkflowMetrics>,
    retry: RetryPolicy,
    expiry_warning_days: i64,
    download_url_ttl: Duration,
}

impl WorkflowBuilder {
    /// Create a new builder with all optional fields set to their defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: None,
            notifications: None,
            blobs: None,
            extractor: None,
            metrics: Arc::new(WorkflowMetrics::default()),
            retry: RetryPolicy::default(),
            expiry_warning_days: 30,
            download_url_ttl: Duration::from_secs(3600),
        }
    }

    /// Set the document store implementation.
    #[must_use]
    pub fn document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.documents = Some(store);
        self
    }

    /// Set the notification store implementation.
    #[must_use]
    pub fn notification_store(mut self, store: Arc<dyn NotificationStore>) -> Self {
        self.notifications = Some(store);
        self
    }

    /// Set the object storage backend.
    #[must_use]
    pub fn blob_store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.blobs = Some(store);
        self
    }

    /// Set the extraction provider.
    #[must_use]
    pub fn extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Share an externally-created metrics instance.
    #[must_use]
    pub fn metrics(mut self, metrics: Arc<WorkflowMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set the retry policy for transient extraction errors.
    #[must_use]
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set how many days before expiry a warning notification is created.
    #[must_use]
    pub fn expiry_warning_days(mut self, days: i64) -> Self {
        self.expiry_warning_days = days;
        self
    }

    /// Set the lifetime of presigned download URLs.
    #[must_use]
    pub fn download_url_ttl(mut self, ttl: Duration) -> Self {
        self.download_url_ttl = ttl;
        self
    }

    /// Build the workflow.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Configuration`] if a required component is
    /// missing.
    pub fn build(self) -> Result<DocumentWorkflow, WorkflowError> {
        let documents = self
            .documents
            .ok_or_else(|| WorkflowError::Configuration("document store is required".to_owned()))?;
        let notifications = self.notifications.ok_or_else(|| {
            WorkflowError::Configuration("notification store is required".to_owned())
        })?;
        let blobs = self
            .blobs
            .ok_or_else(|| WorkflowError::Configuration("blob store is required".to_owned()))?;
        let extractor = self
            .extractor
            .ok_or_else(|| WorkflowError::Configuration("extractor is required".to_owned()))?;

        Ok(DocumentWorkflow {
            documents,
            notifications,
            blobs,
            extractor,
            metrics: self.metrics,
            retry: self.retry,
            expiry_warning_days: self.expiry_warning_days,
            download_url_ttl: self.download_url_ttl,
        })
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
