//! AWS S3 object storage backend for Veridoc.
//!
//! Stores uploaded document bytes in S3 and produces presigned download
//! URLs. Supports endpoint overrides and path-style addressing for local
//! S3-compatible services.

pub mod auth;
pub mod config;
pub mod error;
pub mod store;

pub use config::{AwsBaseConfig, S3Config};
pub use store::S3BlobStore;
