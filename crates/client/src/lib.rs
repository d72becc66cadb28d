//! Veridoc HTTP Client
//!
//! A native Rust client for the Veridoc document verification service.
//!
//! # Quick Start
//!
//! ```no_run
//! use veridoc_client::VeridocClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VeridocClient::new("http://localhost:8080");
//!
//!     // Upload a document
//!     let bytes = std::fs::read("white-card.jpg")?;
//!     let accepted = client
//!         .upload("white-card.jpg", "image/jpeg", bytes.into())
//!         .await?;
//!
//!     // Poll until extraction resolves
//!     let document = client.poll_until_terminal(&accepted.file.id).await?;
//!     println!("status: {}", document.status);
//!
//!     Ok(())
//! }
//! ```

mod error;
mod poller;

pub use error::Error;
pub use poller::{Poller, StatusSource};

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use veridoc_core::{Document, DocumentId, Notification, NotificationId};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Response to a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Always `true` for an accepted upload.
    pub success: bool,
    /// Summary of the accepted file.
    pub file: UploadedFile,
}

/// Identifying details of an accepted upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    /// The generated document id, used to poll for status.
    pub id: DocumentId,
    /// Filename as supplied in the upload.
    #[serde(rename = "originalName")]
    pub original_name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// HTTP client for the Veridoc document verification service.
#[derive(Debug, Clone)]
pub struct VeridocClient {
    client: Client,
    base_url: String,
    owner: Option<String>,
}

/// Builder for configuring a [`VeridocClient`].
#[derive(Debug)]
pub struct VeridocClientBuilder {
    base_url: String,
    timeout: Duration,
    owner: Option<String>,
    client: Option<Client>,
}

impl VeridocClientBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            owner: None,
            client: None,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the owner identity sent with every request.
    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Use a custom reqwest Client.
    ///
    /// Useful for configuring TLS, proxies, or other advanced settings.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<VeridocClient, Error> {
        // Redirects stay unfollowed so download_url can read the
        // presigned target out of the Location header.
        let client = match self.client {
            Some(c) => c,
            None => Client::builder()
                .timeout(self.timeout)
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .map_err(|e| Error::Configuration(e.to_string()))?,
        };

        Ok(VeridocClient {
            client,
            base_url: self.base_url,
            owner: self.owner,
        })
    }
}

impl VeridocClient {
    /// Create a new client with default configuration.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        VeridocClientBuilder::new(base_url)
            .build()
            .expect("default client configuration should not fail")
    }

    /// Create a builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> VeridocClientBuilder {
        VeridocClientBuilder::new(base_url)
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Add the owner header if an owner identity is set.
    fn add_owner(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.owner {
            Some(owner) => req.header("x-owner-id", owner),
            None => req,
        }
    }

    /// Check if the server is up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the server is unreachable.
    pub async fn health(&self) -> Result<bool, Error> {
        let url = format!("{}/api/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(response.status().is_success())
    }

    /// Upload a document for extraction.
    ///
    /// The server responds as soon as the bytes are stored; extraction runs
    /// in the background. Use [`VeridocClient::poll_until_terminal`] to wait
    /// for the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] when the server rejects the upload, for
    /// example for an empty file.
    pub async fn upload(
        &self,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Bytes,
    ) -> Result<UploadResponse, Error> {
        let url = format!("{}/api/upload", self.base_url);
        let part = reqwest::multipart::Part::stream(bytes)
            .file_name(filename.into())
            .mime_str(&mime_type.into())
            .map_err(|e| Error::Configuration(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("document", part);

        let response = self
            .add_owner(self.client.post(&url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        handle_json(response).await
    }

    /// Fetch one document by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with status 404 for an unknown id.
    pub async fn get_document(&self, id: &DocumentId) -> Result<Document, Error> {
        let url = format!("{}/api/document/{id}", self.base_url);
        let response = self
            .add_owner(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        handle_json(response).await
    }

    /// List documents, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the server is unreachable.
    pub async fn list_documents(&self) -> Result<Vec<Document>, Error> {
        let url = format!("{}/api/documents", self.base_url);
        let response = self
            .add_owner(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        handle_json(response).await
    }

    /// List notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the server is unreachable.
    pub async fn list_notifications(&self) -> Result<Vec<Notification>, Error> {
        let url = format!("{}/api/notifications", self.base_url);
        let response = self
            .add_owner(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        handle_json(response).await
    }

    /// Mark a notification as read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with status 404 for an unknown id.
    pub async fn mark_notification_read(
        &self,
        id: &NotificationId,
    ) -> Result<Notification, Error> {
        let url = format!("{}/api/notifications/{id}/read", self.base_url);
        let response = self
            .add_owner(self.client.patch(&url))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        handle_json(response).await
    }

    /// Resolve a storage key to its presigned download URL.
    ///
    /// The server answers with a temporary redirect; this returns the
    /// redirect target without following it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with status 404 for an unknown key.
    pub async fn download_url(&self, storage_key: &str) -> Result<String, Error> {
        let url = format!("{}/api/download/{storage_key}", self.base_url);
        let response = self
            .add_owner(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_redirection() {
            return response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned)
                .ok_or_else(|| {
                    Error::Deserialization("redirect without a Location header".to_owned())
                });
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned(),
        };
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Poll a document until it reaches a terminal status, using the
    /// default [`Poller`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::PollTimeout`] if the document is still pending
    /// after the poller's attempt budget.
    pub async fn poll_until_terminal(&self, id: &DocumentId) -> Result<Document, Error> {
        Poller::default().poll_until_terminal(self, id).await
    }
}

/// Parse a JSON success body, or surface the server's error payload.
async fn handle_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, Error> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| Error::Deserialization(e.to_string()))
    } else {
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned(),
        };
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}
