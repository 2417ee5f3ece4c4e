use crate::{error::Result, services::auth::AuthUser, state::AppState};
use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, patch},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/:id/read", patch(mark_read))
        .route("/read-all", patch(mark_all_read))
}

/// GET /api/notifications — the caller's notifications, newest first.
async fn list_notifications(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Value>> {
    let notifications = state.notification_service.list_for_user(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "data": notifications
    })))
}

async fn unread_count(State(state): State<Arc<AppState>>, user: AuthUser) -> Result<Json<Value>> {
    let count = state.notification_service.unread_count(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "count": count }
    })))
}

/// PATCH /api/notifications/:id/read — scoped to the owning recipient.
async fn mark_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<Value>> {
    let notification = state
        .notification_service
        .mark_read(&user.id, &notification_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Notification marked as read",
        "data": notification
    })))
}

async fn mark_all_read(State(state): State<Arc<AppState>>, user: AuthUser) -> Result<Json<Value>> {
    let modified = state.notification_service.mark_all_read(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("{} notifications marked as read", modified),
        "data": { "modified_count": modified }
    })))
}
