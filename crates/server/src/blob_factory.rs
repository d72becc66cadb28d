use std::sync::Arc;

use veridoc_blob::BlobStore;
use veridoc_blob_memory::MemoryBlobStore;

use crate::config::StorageConfig;
use crate::error::ServerError;

/// Build the blob store named by the configuration.
pub async fn build_blob_store(config: &StorageConfig) -> Result<Arc<dyn BlobStore>, ServerError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryBlobStore::new())),
        #[cfg(feature = "s3")]
        "s3" => Ok(Arc::new(build_s3(config).await?)),
        other => Err(ServerError::Config(format!(
            "unknown storage backend: {other}"
        ))),
    }
}

#[cfg(feature = "s3")]
async fn build_s3(config: &StorageConfig) -> Result<veridoc_blob_s3::S3BlobStore, ServerError> {
    use veridoc_blob_s3::{S3BlobStore, S3Config};

    let bucket = config
        .bucket
        .clone()
        .ok_or_else(|| ServerError::Config("storage.bucket is required for s3".into()))?;
    let region = config
        .region
        .clone()
        .ok_or_else(|| ServerError::Config("storage.region is required for s3".into()))?;

    let mut s3 = S3Config::new(region, bucket).with_force_path_style(config.force_path_style);
    if let Some(prefix) = &config.prefix {
        s3 = s3.with_prefix(prefix.clone());
    }
    if let Some(endpoint) = &config.endpoint_url {
        s3 = s3.with_endpoint_url(endpoint.clone());
    }
    if let Some(role_arn) = &config.role_arn {
        s3 = s3.with_role_arn(role_arn.clone());
    }
    Ok(S3BlobStore::new(s3).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_builds() {
        let config = StorageConfig::default();
        assert!(build_blob_store(&config).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_backend_is_rejected() {
        let config = StorageConfig {
            backend: "ftp".into(),
            ..StorageConfig::default()
        };
        let Err(err) = build_blob_store(&config).await else {
            panic!("unknown backend should be rejected");
        };
        assert!(err.to_string().contains("unknown storage backend"));
    }

    #[cfg(feature = "s3")]
    #[tokio::test]
    async fn s3_backend_requires_bucket() {
        let config = StorageConfig {
            backend: "s3".into(),
            region: Some("ap-southeast-2".into()),
            ..StorageConfig::default()
        };
        let Err(err) = build_blob_store(&config).await else {
            panic!("missing bucket should be rejected");
        };
        assert!(err.to_string().contains("storage.bucket"));
    }
}
