use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect};

use veridoc_core::DocumentId;
use veridoc_workflow::UploadRequest;

use super::AppState;
use super::owner_from_headers;
use super::schemas::{UploadResponse, UploadedFile};
use crate::error::ServerError;

const DEFAULT_MIME: &str = "application/octet-stream";

/// `POST /api/upload` -- accept a multipart upload (field `document`) and
/// enqueue extraction.
///
/// Responds `202 Accepted` as soon as the bytes are stored and the pending
/// record is persisted; extraction runs in the background.
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServerError> {
    let owner = owner_from_headers(&headers);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidUpload(e.to_string()))?
    {
        if field.name() != Some("document") {
            continue;
        }

        let original_name = field
            .file_name()
            .map_or_else(|| "upload".to_owned(), ToOwned::to_owned);
        let mime_type = field
            .content_type()
            .map_or_else(|| DEFAULT_MIME.to_owned(), ToOwned::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::InvalidUpload(e.to_string()))?;

        // An empty part reads the same as an absent one to the caller.
        if bytes.is_empty() {
            return Err(ServerError::NoFileUploaded);
        }

        let document = state
            .workflow
            .submit(UploadRequest {
                bytes,
                original_name,
                mime_type,
                owner,
            })
            .await?;

        let body = UploadResponse {
            success: true,
            file: UploadedFile {
                id: document.id.to_string(),
                original_name: document.original_name,
            },
        };
        return Ok((StatusCode::ACCEPTED, Json(body)));
    }

    Err(ServerError::NoFileUploaded)
}

/// `GET /api/document/{id}` -- fetch one document by id.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let id = DocumentId::new(id);
    let document = state
        .workflow
        .get_document(&id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Document not found".to_owned()))?;
    Ok(Json(document))
}

/// `GET /api/documents` -- list documents, newest first.
///
/// When the request carries an `x-owner-id` header only that owner's
/// documents are returned.
pub async fn list_documents(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    let owner = owner_from_headers(&headers);
    let documents = state.workflow.list_documents(owner.as_ref()).await?;
    Ok(Json(documents))
}

/// `GET /api/download/{*key}` -- redirect to a time-limited download URL.
pub async fn download(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let url = state.workflow.download_url(&key).await?;
    Ok(Redirect::temporary(&url))
}
