pub mod documents;
pub mod health;
pub mod notifications;
pub mod schemas;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderMap;
use axum::routing::{get, patch, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use veridoc_core::OwnerId;
use veridoc_workflow::DocumentWorkflow;

/// Header carrying the caller's opaque owner identity.
pub const OWNER_HEADER: &str = "x-owner-id";

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The document workflow instance.
    pub workflow: Arc<DocumentWorkflow>,
}

/// Extract the owner identity from the request headers, when present.
///
/// A missing or non-UTF-8 header means the request is unscoped.
pub fn owner_from_headers(headers: &HeaderMap) -> Option<OwnerId> {
    headers
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(OwnerId::from)
}

/// Build the API router with all routes and middleware attached.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/metrics", get(health::metrics))
        .route("/api/upload", post(documents::upload))
        .route("/api/document/{id}", get(documents::get_document))
        .route("/api/documents", get(documents::list_documents))
        .route("/api/download/{*key}", get(documents::download))
        .route("/api/notifications", get(notifications::list_notifications))
        .route(
            "/api/notifications/{id}/read",
            patch(notifications::mark_read),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn owner_header_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(OWNER_HEADER, HeaderValue::from_static("user-7"));
        assert_eq!(owner_from_headers(&headers), Some(OwnerId::from("user-7")));
    }

    #[test]
    fn missing_or_empty_owner_header_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(owner_from_headers(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(OWNER_HEADER, HeaderValue::from_static(""));
        assert_eq!(owner_from_headers(&headers), None);
    }
}
