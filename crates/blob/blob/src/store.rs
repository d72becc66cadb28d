use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BlobError;

/// Trait for storing and retrieving raw document bytes.
///
/// Implementations must be `Send + Sync` and safe for concurrent access.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store an object under `key`, overwriting any previous object.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobError>;

    /// Retrieve the full object body for `key`.
    async fn get(&self, key: &str) -> Result<Bytes, BlobError>;

    /// Produce a time-limited URL granting read access to `key`.
    ///
    /// Fails with [`BlobError::NotFound`] if no object exists under the key,
    /// so callers never hand out a URL that will 404.
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, BlobError>;
}

/// Validate an object key before it reaches a backend.
///
/// Rejects empty keys, absolute paths, and path traversal segments.
///
/// # Errors
///
/// Returns [`BlobError::InvalidKey`] for a malformed key.
pub fn validate_key(key: &str) -> Result<(), BlobError> {
    if key.is_empty() {
        return Err(BlobError::InvalidKey("key is empty".to_owned()));
    }
    if key.starts_with('/') {
        return Err(BlobError::InvalidKey(format!(
            "key must be relative: {key}"
        )));
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(BlobError::InvalidKey(format!(
            "key contains a traversal segment: {key}"
        )));
    }
    Ok(())
}
