use serde::Deserialize;

/// Configuration for the object storage backend.
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Which backend to use: `"memory"` or `"s3"`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// S3 bucket holding uploaded documents.
    pub bucket: Option<String>,

    /// AWS region for the S3 backend.
    pub region: Option<String>,

    /// Key prefix applied to all objects.
    pub prefix: Option<String>,

    /// Endpoint URL override for local S3-compatible services.
    pub endpoint_url: Option<String>,

    /// IAM role ARN to assume via STS.
    pub role_arn: Option<String>,

    /// Force path-style addressing (required for `MinIO` and `LocalStack`).
    #[serde(default)]
    pub force_path_style: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            bucket: None,
            region: None,
            prefix: None,
            endpoint_url: None,
            role_arn: None,
            force_path_style: false,
        }
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}
