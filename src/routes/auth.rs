use crate::{
    error::{AppError, Result},
    models::user::{LoginRequest, RegisterRequest, UpdateUserRequest},
    require_super_admin,
    services::auth::AuthUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(get_current_user))
        // User administration (super admin only)
        .route("/users", get(list_users))
        .route("/users/:id", put(update_user))
        .route("/users/:id", delete(delete_user))
}

/// POST /api/auth/register
async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User created successfully",
            "data": user
        })),
    ))
}

/// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let (access_token, refresh_token, user) = state.user_service.login(request).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "access_token": access_token,
            "refresh_token": refresh_token,
            "user": user
        }
    })))
}

/// POST /api/auth/logout — revokes the caller's refresh token.
async fn logout(State(state): State<Arc<AppState>>, user: AuthUser) -> Result<Json<Value>> {
    state.user_service.logout(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Logged out successfully"
    })))
}

/// GET /api/auth/me
async fn get_current_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Value>> {
    let account = state
        .user_service
        .get_user(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(Json(json!({
        "success": true,
        "data": account.to_response()
    })))
}

async fn list_users(State(state): State<Arc<AppState>>, user: AuthUser) -> Result<Json<Value>> {
    require_super_admin!(user);

    let users = state.user_service.list_users().await?;

    Ok(Json(json!({
        "success": true,
        "data": users
    })))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<Value>> {
    require_super_admin!(user);

    let updated = state.user_service.update_user(&user_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "User updated successfully",
        "data": updated
    })))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    require_super_admin!(user);

    state.user_service.delete_user(&user_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "User deleted successfully"
    })))
}
