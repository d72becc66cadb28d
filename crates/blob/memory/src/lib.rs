//! In-memory object storage backend for Veridoc.
//!
//! Holds object bodies in a [`dashmap::DashMap`], suitable for tests and
//! local development. Presigned URLs use a `memory://` pseudo scheme and
//! grant nothing; they exist so the rest of the system can be exercised
//! without a real storage service.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use veridoc_blob::error::BlobError;
use veridoc_blob::store::{BlobStore, validate_key};

/// In-memory [`BlobStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: DashMap<String, (Bytes, String)>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored content type for `key`, if present.
    #[must_use]
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects.get(key).map(|entry| entry.value().1.clone())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobError> {
        validate_key(key)?;
        self.objects
            .insert(key.to_owned(), (bytes, content_type.to_owned()));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, BlobError> {
        validate_key(key)?;
        self.objects
            .get(key)
            .map(|entry| entry.value().0.clone())
            .ok_or_else(|| BlobError::NotFound(key.to_owned()))
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, BlobError> {
        validate_key(key)?;
        if !self.objects.contains_key(key) {
            return Err(BlobError::NotFound(key.to_owned()));
        }
        Ok(format!("memory://{key}?expires_in={}", expires_in.as_secs()))
    }
}
