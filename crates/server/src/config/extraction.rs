use serde::Deserialize;

/// Configuration for the extraction provider.
#[derive(Debug, Deserialize)]
pub struct ExtractionServerConfig {
    /// Which provider to use: `"mock"` or `"http"`.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// OpenAI-compatible chat completions endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Vision-capable model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f64,

    /// Maximum tokens in the response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Override for the built-in extraction prompt.
    pub prompt: Option<String>,
}

impl Default for ExtractionServerConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            prompt: None,
        }
    }
}

fn default_provider() -> String {
    "mock".to_owned()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_owned()
}

fn default_model() -> String {
    "gpt-4o-mini".to_owned()
}

fn default_api_key_env() -> String {
    "VERIDOC_EXTRACTION_API_KEY".to_owned()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    1024
}
