use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, instrument};

use veridoc_blob::error::BlobError;
use veridoc_blob::store::{BlobStore, validate_key};

use crate::auth::build_sdk_config;
use crate::config::S3Config;
use crate::error::classify_sdk_error;

/// AWS S3 implementation of [`BlobStore`].
pub struct S3BlobStore {
    config: S3Config,
    client: aws_sdk_s3::Client,
}

impl std::fmt::Debug for S3BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3BlobStore")
            .field("config", &self.config)
            .field("client", &"<S3Client>")
            .finish()
    }
}

impl S3BlobStore {
    /// Create a new `S3BlobStore` by building an AWS SDK client.
    pub async fn new(config: S3Config) -> Self {
        let sdk_config = build_sdk_config(&config.aws).await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();
        let client = aws_sdk_s3::Client::from_conf(s3_config);
        Self { config, client }
    }

    /// Create an `S3BlobStore` with a pre-built client (for testing).
    pub fn with_client(config: S3Config, client: aws_sdk_s3::Client) -> Self {
        Self { config, client }
    }

    /// Apply the configured prefix to a key.
    fn prefixed_key(&self, key: &str) -> String {
        match &self.config.prefix {
            Some(prefix) => format!("{prefix}{key}"),
            None => key.to_owned(),
        }
    }

    /// Check that an object exists, mapping a missing object to
    /// [`BlobError::NotFound`].
    async fn head(&self, key: &str, full_key: &str) -> Result<(), BlobError> {
        self.client
            .head_object()
            .bucket(&self.config.bucket)
            .key(full_key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .is_some_and(aws_sdk_s3::operation::head_object::HeadObjectError::is_not_found)
                {
                    BlobError::NotFound(key.to_owned())
                } else {
                    classify_sdk_error(key, &e.to_string())
                }
            })?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    #[instrument(skip(self, bytes), fields(bucket = %self.config.bucket, key = %key, size = bytes.len()))]
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobError> {
        validate_key(key)?;
        let full_key = self.prefixed_key(key);

        debug!("uploading object to S3");
        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&full_key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| classify_sdk_error(key, &e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(bucket = %self.config.bucket, key = %key))]
    async fn get(&self, key: &str) -> Result<Bytes, BlobError> {
        validate_key(key)?;
        let full_key = self.prefixed_key(key);

        let response = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(&full_key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .is_some_and(aws_sdk_s3::operation::get_object::GetObjectError::is_no_such_key)
                {
                    BlobError::NotFound(key.to_owned())
                } else {
                    classify_sdk_error(key, &e.to_string())
                }
            })?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| BlobError::Connection(e.to_string()))?;

        Ok(body.into_bytes())
    }

    #[instrument(skip(self), fields(bucket = %self.config.bucket, key = %key))]
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, BlobError> {
        validate_key(key)?;
        let full_key = self.prefixed_key(key);

        // Presigning is a local signature; the object's existence has to be
        // confirmed explicitly so callers never get a URL that will 404.
        self.head(key, &full_key).await?;

        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| BlobError::Configuration(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(&full_key)
            .presigned(presigning)
            .await
            .map_err(|e| classify_sdk_error(key, &e.to_string()))?;

        Ok(presigned.uri().to_string())
    }
}
