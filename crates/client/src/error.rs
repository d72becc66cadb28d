use thiserror::Error;

/// Errors returned by the Veridoc client.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to reach the server.
    #[error("connection error: {0}")]
    Connection(String),

    /// The server returned an error payload.
    #[error("server error ({status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// The response body could not be deserialized.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The client was misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Polling gave up before the document left the pending state.
    #[error("document {0} still pending after {1} polls")]
    PollTimeout(String, u32),
}

impl Error {
    /// Whether retrying the same request could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
