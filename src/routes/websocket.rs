use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::{Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    error::Result,
    require_elevated,
    services::auth::AuthUser,
    state::AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/connect", get(websocket_handler))
        .route("/stats", get(get_realtime_stats))
}

/// GET /api/ws/connect — upgrades an authenticated connection and joins
/// the caller's notification channel.
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Response {
    let connection_id = format!("conn_{}", uuid::Uuid::new_v4());

    info!(
        "WebSocket upgrade request from user: {} with connection: {}",
        user.id, connection_id
    );

    ws.on_upgrade(move |socket| async move {
        if let Err(e) = state
            .realtime_service
            .handle_connection(socket, user.id.clone(), connection_id.clone())
            .await
        {
            error!("Realtime connection error for {}: {}", connection_id, e);
        }

        info!(
            "Realtime connection closed: {} for user: {}",
            connection_id, user.id
        );
    })
}

async fn get_realtime_stats(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Value>> {
    require_elevated!(user);

    let stats = state.realtime_service.get_stats().await;

    Ok(Json(json!({
        "success": true,
        "data": stats
    })))
}
