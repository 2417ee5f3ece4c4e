use crate::{
    error::Result,
    models::author::UpdateProfileRequest,
    require_elevated,
    services::auth::AuthUser,
    state::AppState,
};
use axum::{
    extract::State,
    response::Json,
    routing::{get, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile", put(update_profile))
}

/// GET /api/author/profile — the public author profile.
async fn get_profile(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let profile = state.author_service.get_profile().await?;

    Ok(Json(json!({
        "success": true,
        "data": profile
    })))
}

/// PUT /api/author/profile — creates the profile on first write.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>> {
    require_elevated!(user);

    let profile = state.author_service.update_profile(request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "data": profile
    })))
}
