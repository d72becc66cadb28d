use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use tower::ServiceExt;

use veridoc_blob_memory::MemoryBlobStore;
use veridoc_core::{DocumentStatus, Extraction};
use veridoc_extract::{Extractor, FailingExtractor, MockExtractor};
use veridoc_server::api::{self, AppState};
use veridoc_store_memory::MemoryStore;
use veridoc_workflow::WorkflowBuilder;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const BOUNDARY: &str = "----veridoc-test-boundary";

// -- Helpers --------------------------------------------------------------

fn build_test_state(extractor: Arc<dyn Extractor>) -> AppState {
    let store = Arc::new(MemoryStore::new());
    let blobs = Arc::new(MemoryBlobStore::new());

    let workflow = WorkflowBuilder::new()
        .document_store(store.clone())
        .notification_store(store)
        .blob_store(blobs)
        .extractor(extractor)
        .build()
        .expect("workflow should build");

    AppState {
        workflow: Arc::new(workflow),
    }
}

fn build_app(state: AppState) -> axum::Router {
    api::router(state, MAX_UPLOAD_BYTES)
}

fn multipart_body(field: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(http::Method::POST)
        .uri("/api/upload")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Upload a file and return its document id.
async fn upload_file(app: &axum::Router, filename: &str) -> String {
    let body = multipart_body("document", filename, "image/jpeg", b"fake image bytes");
    let response = app.clone().oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = json_body(response).await;
    json["file"]["id"].as_str().unwrap().to_owned()
}

/// Poll the document endpoint until the status leaves `pending`.
async fn wait_terminal(app: &axum::Router, id: &str) -> serde_json::Value {
    for _ in 0..100 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/document/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        if json["status"] != "pending" {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("document never reached a terminal status");
}

// -- Tests ----------------------------------------------------------------

#[tokio::test]
async fn health_returns_active() {
    let app = build_app(build_test_state(Arc::new(MockExtractor::empty())));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "active");
}

#[tokio::test]
async fn metrics_starts_at_zero() {
    let app = build_app(build_test_state(Arc::new(MockExtractor::empty())));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["uploads"], 0);
    assert_eq!(json["processed"], 0);
}

#[tokio::test]
async fn upload_is_accepted_with_file_summary() {
    let app = build_app(build_test_state(Arc::new(MockExtractor::empty())));

    let body = multipart_body("document", "white card.jpg", "image/jpeg", b"fake image bytes");
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["file"]["originalName"], "white card.jpg");
    assert!(json["file"]["id"].as_str().is_some());
}

#[tokio::test]
async fn upload_without_file_part_is_rejected() {
    let app = build_app(build_test_state(Arc::new(MockExtractor::empty())));

    let body = multipart_body("attachment", "card.jpg", "image/jpeg", b"bytes");
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "No file uploaded");
}

#[tokio::test]
async fn upload_with_empty_file_is_rejected() {
    let app = build_app(build_test_state(Arc::new(MockExtractor::empty())));

    let body = multipart_body("document", "card.jpg", "image/jpeg", b"");
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "No file uploaded");
}

#[tokio::test]
async fn document_reaches_processed_after_extraction() {
    let extraction = Extraction::default()
        .with_doc_type("white_card")
        .with_expiry_date("2031-01-15");
    let app = build_app(build_test_state(Arc::new(MockExtractor::with_extraction(
        extraction,
    ))));

    let id = upload_file(&app, "white-card.jpg").await;
    let document = wait_terminal(&app, &id).await;

    assert_eq!(document["status"], DocumentStatus::Processed.as_str());
    assert_eq!(document["extraction"]["type"], "white_card");
    assert_eq!(document["extraction"]["expiry_date"], "2031-01-15");
}

#[tokio::test]
async fn document_reaches_failed_when_extraction_errors() {
    let app = build_app(build_test_state(Arc::new(FailingExtractor::new(
        "provider unavailable",
    ))));

    let id = upload_file(&app, "blurry.jpg").await;
    let document = wait_terminal(&app, &id).await;

    assert_eq!(document["status"], DocumentStatus::Failed.as_str());
    assert!(document["extraction"].is_null());
}

#[tokio::test]
async fn unknown_document_returns_404() {
    let app = build_app(build_test_state(Arc::new(MockExtractor::empty())));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/document/no-such-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Document not found");
}

#[tokio::test]
async fn documents_listing_includes_uploads() {
    let app = build_app(build_test_state(Arc::new(MockExtractor::empty())));

    upload_file(&app, "first.jpg").await;
    upload_file(&app, "second.jpg").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/documents")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 2);
}

#[tokio::test]
async fn owner_header_scopes_document_listing() {
    let app = build_app(build_test_state(Arc::new(MockExtractor::empty())));

    let body = multipart_body("document", "mine.jpg", "image/jpeg", b"bytes");
    let response = app
        .clone()
        .oneshot({
            let mut request = upload_request(body);
            request
                .headers_mut()
                .insert("x-owner-id", "user-1".parse().unwrap());
            request
        })
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    upload_file(&app, "unowned.jpg").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/documents")
                .header("x-owner-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = json_body(response).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["original_name"], "mine.jpg");
}

#[tokio::test]
async fn expiry_warning_shows_in_notifications() {
    let soon = (chrono::Utc::now().date_naive() + chrono::Duration::days(10))
        .format("%Y-%m-%d")
        .to_string();
    let extraction = Extraction::default()
        .with_doc_type("white_card")
        .with_expiry_date(&soon);
    let app = build_app(build_test_state(Arc::new(MockExtractor::with_extraction(
        extraction,
    ))));

    let id = upload_file(&app, "expiring.jpg").await;
    wait_terminal(&app, &id).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/notifications")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["kind"], "expiry_warning");
    assert_eq!(list[0]["read"], false);

    // Mark it read, then confirm the change sticks.
    let notification_id = list[0]["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(http::Method::PATCH)
                .uri(format!("/api/notifications/{notification_id}/read"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["read"], true);

    // A read notification drops out of the unread-only view.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/notifications?unread_only=true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn marking_unknown_notification_returns_404() {
    let app = build_app(build_test_state(Arc::new(MockExtractor::empty())));

    let response = app
        .oneshot(
            Request::builder()
                .method(http::Method::PATCH)
                .uri("/api/notifications/no-such-id/read")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_redirects_to_presigned_url() {
    let app = build_app(build_test_state(Arc::new(MockExtractor::empty())));

    let id = upload_file(&app, "card.jpg").await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/document/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let document = json_body(response).await;
    let key = document["storage_key"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/download/{key}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response
        .headers()
        .get(http::header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.starts_with("memory://"));
}

#[tokio::test]
async fn download_of_missing_key_returns_404() {
    let app = build_app(build_test_state(Arc::new(MockExtractor::empty())));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/download/uploads/no-such-object")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
