//! Document intake and extraction workflow for Veridoc.
//!
//! Ties the stores, object storage, and the extraction provider together:
//! an upload is persisted, a pending record is created, and extraction
//! runs in the background until the record reaches `processed` or
//! `failed`. Each document makes that transition exactly once.

pub mod builder;
pub mod error;
pub mod metrics;
pub mod workflow;

pub use builder::WorkflowBuilder;
pub use error::WorkflowError;
pub use metrics::{MetricsSnapshot, WorkflowMetrics};
pub use workflow::{DocumentWorkflow, RetryPolicy, UploadRequest};
