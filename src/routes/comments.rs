use crate::{
    error::Result,
    models::comment::*,
    require_elevated,
    services::auth::AuthUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        // Public surface
        .route("/", post(create_comment))
        .route("/approved", get(list_approved_comments))
        .route("/approved/count", get(count_approved_comments))
        // Moderation surface
        .route("/pending", get(list_pending_comments))
        .route("/pending/count", get(count_pending_comments))
        .route("/:id/status", put(update_comment_status))
}

/// POST /api/comments — public review submission.
async fn create_comment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse> {
    let comment = state.comment_service.create_comment(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Review submitted successfully",
            "data": comment
        })),
    ))
}

/// GET /api/comments/approved — published reviews, newest first.
async fn list_approved_comments(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let comments = state.comment_service.list_approved().await?;

    Ok(Json(json!({
        "success": true,
        "data": comments
    })))
}

async fn count_approved_comments(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let count = state.comment_service.count_approved().await?;

    Ok(Json(json!({
        "success": true,
        "data": { "count": count }
    })))
}

/// GET /api/comments/pending — the moderation queue.
async fn list_pending_comments(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Value>> {
    require_elevated!(user);

    let comments = state.comment_service.list_pending().await?;

    Ok(Json(json!({
        "success": true,
        "data": comments
    })))
}

async fn count_pending_comments(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Value>> {
    require_elevated!(user);

    let count = state.comment_service.count_pending().await?;

    Ok(Json(json!({
        "success": true,
        "data": { "count": count }
    })))
}

/// PUT /api/comments/:id/status — approve or reject a review.
async fn update_comment_status(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(comment_id): Path<String>,
    Json(request): Json<UpdateCommentStatusRequest>,
) -> Result<Json<Value>> {
    require_elevated!(user);

    let comment = state
        .comment_service
        .set_status(&comment_id, &request.status)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Review status updated to '{}'", comment.status.as_str()),
        "data": comment
    })))
}
