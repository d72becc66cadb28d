use serde::Deserialize;

/// Configuration for workflow behaviour.
#[derive(Debug, Deserialize)]
pub struct WorkflowServerConfig {
    /// Total extraction attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between extraction attempts, in milliseconds.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// How many days before expiry a warning notification is created.
    #[serde(default = "default_expiry_warning_days")]
    pub expiry_warning_days: i64,

    /// Lifetime of presigned download URLs, in seconds.
    #[serde(default = "default_download_url_ttl")]
    pub download_url_ttl_seconds: u64,
}

impl Default for WorkflowServerConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            expiry_warning_days: default_expiry_warning_days(),
            download_url_ttl_seconds: default_download_url_ttl(),
        }
    }
}

fn default_max_attempts() -> u32 {
    1
}

fn default_backoff_ms() -> u64 {
    500
}

fn default_expiry_warning_days() -> i64 {
    30
}

fn default_download_url_ttl() -> u64 {
    3600
}
