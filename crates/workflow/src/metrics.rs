use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Atomic counters tracking workflow outcomes.
///
/// All counters use relaxed ordering for maximum throughput. For a
/// consistent point-in-time view, call [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct WorkflowMetrics {
    /// Uploads accepted.
    pub uploads: AtomicU64,
    /// Documents that reached `processed`.
    pub processed: AtomicU64,
    /// Documents that reached `failed`.
    pub failed: AtomicU64,
    /// Extraction attempts retried after a transient error.
    pub retries: AtomicU64,
    /// Expiry warnings produced from extraction results.
    pub expiry_warnings: AtomicU64,
}

impl WorkflowMetrics {
    /// Increment the uploads counter.
    pub fn increment_uploads(&self) {
        self.uploads.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the processed counter.
    pub fn increment_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the failed counter.
    pub fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the retries counter.
    pub fn increment_retries(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the expiry warnings counter.
    pub fn increment_expiry_warnings(&self) {
        self.expiry_warnings.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a consistent point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uploads: self.uploads.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            expiry_warnings: self.expiry_warnings.load(Ordering::Relaxed),
        }
    }
}

/// A plain data snapshot of [`WorkflowMetrics`] at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Uploads accepted.
    pub uploads: u64,
    /// Documents that reached `processed`.
    pub processed: u64,
    /// Documents that reached `failed`.
    pub failed: u64,
    /// Extraction attempts retried after a transient error.
    pub retries: u64,
    /// Expiry warnings produced.
    pub expiry_warnings: u64,
}
