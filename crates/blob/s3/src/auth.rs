use tracing::{debug, info};

use crate::config::AwsBaseConfig;

/// Build an AWS SDK configuration from the given [`AwsBaseConfig`].
///
/// Uses the standard AWS SDK environment credential chain and optionally:
/// - Overrides the endpoint URL for local development (e.g. `LocalStack`
///   or `MinIO`)
/// - Assumes an IAM role via STS if `role_arn` is configured, with automatic
///   credential refresh before expiry
pub async fn build_sdk_config(config: &AwsBaseConfig) -> aws_config::SdkConfig {
    let mut loader = aws_config::from_env().region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        debug!(endpoint = %endpoint, "using custom AWS endpoint");
        loader = loader.endpoint_url(endpoint);
    }

    if let Some(role_arn) = &config.role_arn {
        let session_name = config.session_name.as_deref().unwrap_or("veridoc-blob-s3");

        info!(role_arn = %role_arn, session_name = %session_name, "assuming IAM role via STS (auto-refresh)");

        // Load the base config first so the assume-role provider inherits
        // the endpoint override and base credentials for STS calls.
        let base_config = loader.load().await;

        let mut provider_builder = aws_config::sts::AssumeRoleProvider::builder(role_arn)
            .session_name(session_name)
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(ref external_id) = config.external_id {
            provider_builder = provider_builder.external_id(external_id);
        }

        let assume_role_provider = provider_builder.configure(&base_config).build().await;

        let mut final_loader = aws_config::from_env()
            .region(aws_config::Region::new(config.region.clone()))
            .credentials_provider(assume_role_provider);

        if let Some(endpoint) = &config.endpoint_url {
            final_loader = final_loader.endpoint_url(endpoint);
        }

        return final_loader.load().await;
    }

    loader.load().await
}
