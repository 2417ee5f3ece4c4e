use crate::{
    error::Result,
    models::category::{CreateCategoryRequest, UpdateCategoryRequest},
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
        .route("/", get(list_categories))
        .route("/", post(create_category))
        .route("/:id", get(get_category))
        .route("/:id", put(update_category))
        .route("/:id", delete(delete_category))
}

async fn list_categories(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let categories = state.category_service.list_categories().await?;

    Ok(Json(json!({
        "success": true,
        "data": categories
    })))
}

async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<String>,
) -> Result<Json<Value>> {
    let category = state.category_service.get_category(&category_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": category
    })))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse> {
    require_super_admin!(user);

    let category = state.category_service.create_category(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Category created successfully",
            "data": category
        })),
    ))
}

async fn update_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(category_id): Path<String>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<Value>> {
    require_super_admin!(user);

    let category = state
        .category_service
        .update_category(&category_id, request)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Category updated successfully",
        "data": category
    })))
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(category_id): Path<String>,
) -> Result<Json<Value>> {
    require_super_admin!(user);

    state.category_service.delete_category(&category_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Category deleted successfully"
    })))
}
