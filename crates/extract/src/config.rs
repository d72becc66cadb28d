/// Configuration for the HTTP-based document extractor.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// OpenAI-compatible API endpoint (e.g., `https://api.openai.com/v1/chat/completions`).
    pub endpoint: String,
    /// Vision-capable model to use (e.g., `gpt-4o-mini`).
    pub model: String,
    /// API key for authentication.
    pub api_key: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Temperature for sampling (0.0 = deterministic).
    pub temperature: f64,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
    /// Override for the built-in extraction prompt.
    pub prompt: Option<String>,
}

impl ExtractionConfig {
    /// Create a new config with the given endpoint, model, and API key.
    ///
    /// Uses sensible defaults: 60s timeout, temperature 0.0, max 1024 tokens,
    /// the built-in extraction prompt.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            timeout_seconds: 60,
            temperature: 0.0,
            max_tokens: 1024,
            prompt: None,
        }
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Set the temperature for sampling.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum tokens in the response.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Replace the built-in extraction prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}
