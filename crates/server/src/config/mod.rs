mod extraction;
mod server;
mod storage;
mod store;
mod workflow;

pub use extraction::*;
pub use server::*;
pub use storage::*;
pub use store::*;
pub use workflow::*;

use serde::Deserialize;

/// Top-level configuration for the Veridoc server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct VeridocConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Document and notification store backend configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Object storage backend configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Extraction provider configuration.
    #[serde(default)]
    pub extraction: ExtractionServerConfig,
    /// Workflow behaviour configuration.
    #[serde(default)]
    pub workflow: WorkflowServerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config: VeridocConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.extraction.provider, "mock");
        assert_eq!(config.workflow.expiry_warning_days, 30);
        assert_eq!(config.workflow.download_url_ttl_seconds, 3600);
    }

    #[test]
    fn full_toml_parses() {
        let toml_str = r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            max_upload_bytes = 5242880

            [store]
            backend = "postgres"
            url = "postgres://localhost:5432/veridoc"
            pool_size = 10
            table_prefix = "vd_"

            [storage]
            backend = "s3"
            bucket = "veridoc-uploads"
            region = "ap-southeast-2"
            endpoint_url = "http://localhost:9000"
            force_path_style = true

            [extraction]
            provider = "http"
            model = "gpt-4o"
            timeout_seconds = 90

            [workflow]
            max_attempts = 3
            expiry_warning_days = 14
        "#;
        let config: VeridocConfig = toml::from_str(toml_str).expect("config should parse");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.store.backend, "postgres");
        assert_eq!(config.store.pool_size, Some(10));
        assert_eq!(config.storage.bucket.as_deref(), Some("veridoc-uploads"));
        assert!(config.storage.force_path_style);
        assert_eq!(config.extraction.model, "gpt-4o");
        assert_eq!(config.workflow.max_attempts, 3);
        assert_eq!(config.workflow.expiry_warning_days, 14);
    }
}
