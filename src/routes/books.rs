use crate::{
    error::Result,
    models::book::{BookListQuery, CreateBookRequest},
    require_elevated,
    services::auth::AuthUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_book))
        .route("/", get(list_books))
        .route("/count", get(count_books))
        .route("/:id", get(get_book))
}

/// POST /api/books
async fn create_book(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<CreateBookRequest>,
) -> Result<impl IntoResponse> {
    require_elevated!(user);

    let book = state.book_service.create_book(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Book saved successfully",
            "data": book
        })),
    ))
}

/// GET /api/books?category_id=..&limit=..
async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookListQuery>,
) -> Result<Json<Value>> {
    let books = state.book_service.list_books(query).await?;

    Ok(Json(json!({
        "success": true,
        "data": books
    })))
}

async fn count_books(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let count = state.book_service.count_books().await?;

    Ok(Json(json!({
        "success": true,
        "data": { "count": count }
    })))
}

async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
) -> Result<Json<Value>> {
    let book = state.book_service.get_book(&book_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": book
    })))
}
