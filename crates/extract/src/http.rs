use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde_json::json;
use tracing::{debug, warn};

use veridoc_core::Extraction;

use crate::config::ExtractionConfig;
use crate::error::ExtractorError;
use crate::extractor::{ExtractionInput, Extractor};

/// Instructions sent as the system message for every extraction request.
///
/// The model is asked for a single JSON object so the response can be
/// deserialized straight into [`Extraction`]; fields it cannot read from
/// the document are expected to be omitted.
const DEFAULT_PROMPT: &str = "You are a strict compliance officer reviewing trade licences, \
certifications, and identity documents. Examine the attached document and extract the \
following fields into a single JSON object, omitting any field you cannot read: \
\"type\" (the kind of document, e.g. \"White Card\", \"Driver Licence\"), \
\"expiryDate\" (in YYYY-MM-DD format), \"licenseNumber\", \"name\" (the holder's full name), \
\"confidence\" (your confidence in the extraction, 0.0 to 1.0), and \"content\" (a short \
plain-text summary of the document). Respond with the JSON object only.";

/// HTTP-based extractor using an OpenAI-compatible chat completions API
/// with vision input.
#[derive(Debug)]
pub struct HttpExtractor {
    client: reqwest::Client,
    config: ExtractionConfig,
}

impl HttpExtractor {
    /// Create a new HTTP extractor with the given configuration.
    pub fn new(config: ExtractionConfig) -> Result<Self, ExtractorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ExtractorError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Encode the document as a `data:` URI for the `image_url` content part.
    fn data_uri(input: &ExtractionInput) -> Result<String, ExtractorError> {
        if !input.mime_type.starts_with("image/") && input.mime_type != "application/pdf" {
            return Err(ExtractorError::UnsupportedMediaType(
                input.mime_type.clone(),
            ));
        }
        let encoded = base64::engine::general_purpose::STANDARD.encode(&input.bytes);
        Ok(format!("data:{};base64,{encoded}", input.mime_type))
    }

    /// Parse the model response, stripping markdown code fences if present.
    fn parse_response(content: &str) -> Result<Extraction, ExtractorError> {
        let trimmed = content.trim();

        // Strip markdown code fences (```json ... ``` or ``` ... ```)
        let json_str = if trimmed.starts_with("```") {
            let without_opening = if let Some(rest) = trimmed.strip_prefix("```json") {
                rest
            } else {
                trimmed.strip_prefix("```").unwrap_or(trimmed)
            };
            without_opening
                .strip_suffix("```")
                .unwrap_or(without_opening)
                .trim()
        } else {
            trimmed
        };

        serde_json::from_str::<Extraction>(json_str).map_err(|e| {
            ExtractorError::ParseError(format!(
                "failed to parse extraction as JSON: {e}. Raw content: {content}"
            ))
        })
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn extract(&self, input: &ExtractionInput) -> Result<Extraction, ExtractorError> {
        let data_uri = Self::data_uri(input)?;
        let prompt = self.config.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);

        let request_body = json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "response_format": { "type": "json_object" },
            "messages": [
                {
                    "role": "system",
                    "content": prompt,
                },
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "text",
                            "text": format!("Document filename: {}", input.original_name),
                        },
                        {
                            "type": "image_url",
                            "image_url": { "url": data_uri },
                        }
                    ],
                }
            ]
        });

        debug!(
            endpoint = %self.config.endpoint,
            model = %self.config.model,
            mime_type = %input.mime_type,
            size = input.bytes.len(),
            "sending extraction request"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractorError::Timeout(self.config.timeout_seconds)
                } else {
                    ExtractorError::HttpError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "extraction API returned error");
            return Err(ExtractorError::ApiError(format!("HTTP {status}: {body}")));
        }

        let response_json: serde_json::Value = response.json().await.map_err(|e| {
            ExtractorError::ParseError(format!("failed to parse API response: {e}"))
        })?;

        // Extract the content from the OpenAI chat completions response format
        let content = response_json
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                ExtractorError::ParseError(format!("unexpected response format: {response_json}"))
            })?;

        Self::parse_response(content)
    }
}
