use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use serde::Deserialize;

use veridoc_core::NotificationId;
use veridoc_workflow::WorkflowError;

use super::AppState;
use super::owner_from_headers;
use crate::error::ServerError;

/// Query parameters for the notification listing.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    /// When `true`, only unread notifications are returned.
    #[serde(default)]
    pub unread_only: bool,
}

/// `GET /api/notifications` -- list notifications, newest first.
///
/// Broadcast notifications (no owner) are visible to everyone; owned
/// notifications only to the matching `x-owner-id`. Pass
/// `?unread_only=true` to hide notifications already marked read.
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    let owner = owner_from_headers(&headers);
    let mut notifications = state.workflow.list_notifications(owner.as_ref()).await?;
    if query.unread_only {
        notifications.retain(|n| !n.read);
    }
    Ok(Json(notifications))
}

/// `PATCH /api/notifications/{id}/read` -- mark a notification as read.
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let id = NotificationId::new(id);
    let notification = state
        .workflow
        .mark_notification_read(&id)
        .await
        .map_err(|e| match e {
            WorkflowError::NotFound(_) => {
                ServerError::NotFound("Notification not found".to_owned())
            }
            e => e.into(),
        })?;
    Ok(Json(notification))
}
