use serde::{Deserialize, Serialize};

/// Shared base configuration for AWS access.
///
/// Contains common settings like region, optional STS assume-role ARN for
/// cross-account access, and an endpoint URL override for local development
/// (e.g. `LocalStack` or `MinIO`).
#[derive(Clone, Serialize, Deserialize)]
pub struct AwsBaseConfig {
    /// AWS region (e.g. `"ap-southeast-2"`).
    pub region: String,

    /// Optional IAM role ARN to assume via STS for cross-account access.
    pub role_arn: Option<String>,

    /// Optional endpoint URL override for local development.
    pub endpoint_url: Option<String>,

    /// Optional STS session name (defaults to `"veridoc-blob-s3"`).
    #[serde(default)]
    pub session_name: Option<String>,

    /// Optional external ID for cross-account trust policies.
    #[serde(default)]
    pub external_id: Option<String>,
}

impl std::fmt::Debug for AwsBaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsBaseConfig")
            .field("region", &self.region)
            .field("role_arn", &self.role_arn.as_ref().map(|_| "[REDACTED]"))
            .field("endpoint_url", &self.endpoint_url)
            .field("session_name", &self.session_name)
            .field("external_id", &self.external_id)
            .finish()
    }
}

impl AwsBaseConfig {
    /// Create a new `AwsBaseConfig` with the given region.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            role_arn: None,
            endpoint_url: None,
            session_name: None,
            external_id: None,
        }
    }

    /// Set an IAM role ARN to assume via STS.
    #[must_use]
    pub fn with_role_arn(mut self, role_arn: impl Into<String>) -> Self {
        self.role_arn = Some(role_arn.into());
        self
    }

    /// Set an endpoint URL override for local development.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Set the STS session name for assume-role.
    #[must_use]
    pub fn with_session_name(mut self, session_name: impl Into<String>) -> Self {
        self.session_name = Some(session_name.into());
        self
    }

    /// Set the external ID for cross-account trust policies.
    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

impl Default for AwsBaseConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_owned(),
            role_arn: None,
            endpoint_url: None,
            session_name: None,
            external_id: None,
        }
    }
}

/// Configuration for the S3 storage backend.
#[derive(Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// Shared AWS configuration (region, role ARN, endpoint URL).
    #[serde(flatten)]
    pub aws: AwsBaseConfig,

    /// S3 bucket holding the uploaded documents.
    pub bucket: String,

    /// Optional key prefix for all objects (e.g. `"veridoc/"`).
    pub prefix: Option<String>,

    /// Force path-style addressing (required for `MinIO` and `LocalStack`).
    #[serde(default)]
    pub force_path_style: bool,
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("aws", &self.aws)
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

impl S3Config {
    /// Create a new `S3Config` with the given AWS region and bucket.
    pub fn new(region: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            aws: AwsBaseConfig::new(region),
            bucket: bucket.into(),
            prefix: None,
            force_path_style: false,
        }
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the endpoint URL override (for `LocalStack` or `MinIO`).
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.aws.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Set the IAM role ARN to assume.
    #[must_use]
    pub fn with_role_arn(mut self, role_arn: impl Into<String>) -> Self {
        self.aws.role_arn = Some(role_arn.into());
        self
    }

    /// Enable path-style addressing.
    #[must_use]
    pub fn with_force_path_style(mut self, force: bool) -> Self {
        self.force_path_style = force;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_sets_region_and_bucket() {
        let config = S3Config::new("ap-southeast-2", "veridoc-uploads");
        assert_eq!(config.aws.region, "ap-southeast-2");
        assert_eq!(config.bucket, "veridoc-uploads");
        assert!(config.prefix.is_none());
        assert!(!config.force_path_style);
    }

    #[test]
    fn debug_redacts_role_arn() {
        let config = S3Config::new("us-east-1", "b")
            .with_role_arn("arn:aws:iam::123456789012:role/test");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("123456789012"));
    }

    #[test]
    fn serde_roundtrip_flattens_aws_fields() {
        let config = S3Config::new("eu-west-1", "bucket")
            .with_endpoint_url("http://localhost:9000")
            .with_force_path_style(true);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"region\":\"eu-west-1\""));

        let back: S3Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.aws.region, "eu-west-1");
        assert_eq!(back.bucket, "bucket");
        assert!(back.force_path_style);
        assert_eq!(
            back.aws.endpoint_url.as_deref(),
            Some("http://localhost:9000")
        );
    }
}
