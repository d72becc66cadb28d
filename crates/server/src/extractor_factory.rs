use std::sync::Arc;

use veridoc_extract::{ExtractionConfig, Extractor, HttpExtractor, MockExtractor};

use crate::config::ExtractionServerConfig;
use crate::error::ServerError;

/// Build the extractor named by the configuration.
///
/// The `http` provider reads its API key from the environment variable named
/// by `api_key_env` so the key never has to appear in the config file.
pub fn build_extractor(config: &ExtractionServerConfig) -> Result<Arc<dyn Extractor>, ServerError> {
    match config.provider.as_str() {
        "mock" => Ok(Arc::new(MockExtractor::empty())),
        "http" => {
            let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                ServerError::Config(format!(
                    "environment variable {} is not set",
                    config.api_key_env
                ))
            })?;
            let mut extraction =
                ExtractionConfig::new(&config.endpoint, &config.model, api_key)
                    .with_timeout(config.timeout_seconds)
                    .with_temperature(config.temperature)
                    .with_max_tokens(config.max_tokens);
            if let Some(prompt) = &config.prompt {
                extraction = extraction.with_prompt(prompt.clone());
            }
            let extractor = HttpExtractor::new(extraction)
                .map_err(|e| ServerError::Config(format!("failed to build extractor: {e}")))?;
            Ok(Arc::new(extractor))
        }
        other => Err(ServerError::Config(format!(
            "unknown extraction provider: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_provider_builds() {
        let config = ExtractionServerConfig::default();
        assert!(build_extractor(&config).is_ok());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let config = ExtractionServerConfig {
            provider: "gemini".into(),
            ..ExtractionServerConfig::default()
        };
        let err = build_extractor(&config).unwrap_err();
        assert!(err.to_string().contains("unknown extraction provider"));
    }

    #[test]
    fn http_provider_requires_api_key_env() {
        let config = ExtractionServerConfig {
            provider: "http".into(),
            api_key_env: "VERIDOC_TEST_MISSING_KEY".into(),
            ..ExtractionServerConfig::default()
        };
        let err = build_extractor(&config).unwrap_err();
        assert!(err.to_string().contains("VERIDOC_TEST_MISSING_KEY"));
    }
}
