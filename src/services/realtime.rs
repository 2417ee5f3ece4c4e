use crate::{
    error::{AppError, Result},
    models::{
        notification::Notification,
        realtime::{RealtimeEvent, RealtimeMessage},
    },
};
use axum::extract::ws::{Message, WebSocket};
use chrono::{DateTime, Utc};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Serialize;
use serde_json::json;
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, RwLock},
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Realtime connection manager. Owns the explicit mapping from user id to
/// that user's live connection senders; dispatchers query it, they never
/// track sessions themselves.
#[derive(Clone)]
pub struct RealtimeService {
    connections: Arc<RwLock<HashMap<String, ConnectionInfo>>>,
    user_connections: Arc<RwLock<HashMap<String, HashSet<String>>>>,
}

#[derive(Debug, Clone)]
struct ConnectionInfo {
    user_id: String,
    tx: mpsc::UnboundedSender<RealtimeMessage>,
    last_ping_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RealtimeStats {
    pub total_connections: usize,
    pub active_users: usize,
}

impl RealtimeService {
    pub async fn new() -> Result<Self> {
        let service = Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            user_connections: Arc::new(RwLock::new(HashMap::new())),
        };

        // Sweep connections that stopped answering pings
        let service_clone = service.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                service_clone.cleanup_stale_connections();
            }
        });

        Ok(service)
    }

    /// Drives a WebSocket connection until it closes. Registers the
    /// connection on entry and deregisters it on exit.
    pub async fn handle_connection(
        &self,
        websocket: WebSocket,
        user_id: String,
        connection_id: String,
    ) -> Result<()> {
        info!("New realtime connection: {} for user: {}", connection_id, user_id);

        let (mut ws_tx, mut ws_rx) = websocket.split();
        let (tx, mut rx) = mpsc::unbounded_channel();

        self.register_connection(&connection_id, &user_id, tx.clone());

        let connect_msg = RealtimeMessage::new(
            RealtimeEvent::Connect,
            json!({
                "connection_id": connection_id,
                "user_id": user_id,
            }),
        );
        if tx.send(connect_msg).is_err() {
            error!("Failed to send connect message to {}", connection_id);
        }

        // Outbound: drain the per-connection queue into the socket
        let connection_id_clone = connection_id.clone();
        let send_task = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match serde_json::to_string(&message) {
                    Ok(json_str) => {
                        if let Err(e) = ws_tx.send(Message::Text(json_str)).await {
                            error!("Failed to send realtime message: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Failed to serialize realtime message: {}", e);
                    }
                }
            }
            debug!("Send task ended for connection: {}", connection_id_clone);
        });

        // Inbound: answer pings, stop on close
        let service_clone = self.clone();
        let connection_id_clone = connection_id.clone();
        let receive_task = tokio::spawn(async move {
            while let Some(msg_result) = ws_rx.next().await {
                match msg_result {
                    Ok(Message::Text(text)) => {
                        if let Err(e) = service_clone.handle_incoming_message(&connection_id_clone, text) {
                            warn!("Error handling incoming message: {}", e);
                        }
                    }
                    Ok(Message::Close(_)) => {
                        info!("Realtime connection closed: {}", connection_id_clone);
                        break;
                    }
                    Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                        service_clone.update_last_ping(&connection_id_clone);
                    }
                    Ok(Message::Binary(data)) => {
                        debug!("Ignoring binary message of {} bytes", data.len());
                    }
                    Err(e) => {
                        warn!("Realtime connection error for {}: {}", connection_id_clone, e);
                        break;
                    }
                }
            }
            debug!("Receive task ended for connection: {}", connection_id_clone);
        });

        let _ = tokio::try_join!(send_task, receive_task);

        self.unregister_connection(&connection_id, &user_id);

        Ok(())
    }

    fn register_connection(
        &self,
        connection_id: &str,
        user_id: &str,
        tx: mpsc::UnboundedSender<RealtimeMessage>,
    ) {
        {
            let mut connections = self.connections.write().unwrap();
            connections.insert(
                connection_id.to_string(),
                ConnectionInfo {
                    user_id: user_id.to_string(),
                    tx,
                    last_ping_at: Utc::now(),
                },
            );
        }

        {
            let mut user_connections = self.user_connections.write().unwrap();
            user_connections
                .entry(user_id.to_string())
                .or_insert_with(HashSet::new)
                .insert(connection_id.to_string());
        }

        debug!("Registered connection: {} for user: {}", connection_id, user_id);
    }

    fn unregister_connection(&self, connection_id: &str, user_id: &str) {
        {
            let mut connections = self.connections.write().unwrap();
            connections.remove(connection_id);
        }

        {
            let mut user_connections = self.user_connections.write().unwrap();
            if let Some(user_conns) = user_connections.get_mut(user_id) {
                user_conns.remove(connection_id);
                if user_conns.is_empty() {
                    user_connections.remove(user_id);
                }
            }
        }

        info!("Unregistered connection: {} for user: {}", connection_id, user_id);
    }

    fn handle_incoming_message(&self, connection_id: &str, text: String) -> Result<()> {
        let message: RealtimeMessage = serde_json::from_str(&text)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {}", e)))?;

        match message.event {
            RealtimeEvent::Ping => {
                self.update_last_ping(connection_id);
                self.send_to_connection(connection_id, RealtimeMessage::pong(connection_id));
            }
            other => {
                debug!("Ignoring unexpected client event: {:?}", other);
            }
        }

        Ok(())
    }

    fn send_to_connection(&self, connection_id: &str, message: RealtimeMessage) -> bool {
        let tx = {
            let connections = self.connections.read().unwrap();
            connections.get(connection_id).map(|conn| conn.tx.clone())
        };

        match tx {
            Some(tx) => {
                if tx.send(message).is_err() {
                    warn!("Failed to send message to connection: {}", connection_id);
                    false
                } else {
                    true
                }
            }
            None => false,
        }
    }

    /// Delivers a message to every live connection of a user, best-effort.
    /// A recipient without an active session, or a connection whose queue
    /// has closed, is skipped and logged. Returns the delivered count.
    pub async fn send_to_user(&self, user_id: &str, message: RealtimeMessage) -> usize {
        let connection_ids = {
            let user_connections = self.user_connections.read().unwrap();
            user_connections.get(user_id).cloned()
        };

        let Some(connection_ids) = connection_ids else {
            debug!("No active realtime session for user: {}", user_id);
            return 0;
        };

        let mut delivered = 0;
        for connection_id in connection_ids {
            if self.send_to_connection(&connection_id, message.clone()) {
                delivered += 1;
            } else {
                warn!(
                    "Skipped dead connection {} while delivering to user {}",
                    connection_id, user_id
                );
            }
        }
        delivered
    }

    /// Pushes a persisted notification to its recipient's session(s).
    pub async fn publish_notification(&self, notification: &Notification) -> usize {
        self.send_to_user(&notification.user_id, RealtimeMessage::notification(notification))
            .await
    }

    fn update_last_ping(&self, connection_id: &str) {
        let mut connections = self.connections.write().unwrap();
        if let Some(conn) = connections.get_mut(connection_id) {
            conn.last_ping_at = Utc::now();
        }
    }

    fn cleanup_stale_connections(&self) {
        let threshold = Utc::now() - chrono::Duration::seconds(300);
        let stale: Vec<(String, String)> = {
            let connections = self.connections.read().unwrap();
            connections
                .iter()
                .filter(|(_, conn)| conn.last_ping_at < threshold)
                .map(|(id, conn)| (id.clone(), conn.user_id.clone()))
                .collect()
        };

        for (connection_id, user_id) in stale {
            warn!("Cleaning up stale connection: {} for user: {}", connection_id, user_id);
            self.unregister_connection(&connection_id, &user_id);
        }
    }

    pub async fn get_stats(&self) -> RealtimeStats {
        let total_connections = self.connections.read().unwrap().len();
        let active_users = self.user_connections.read().unwrap().len();

        RealtimeStats {
            total_connections,
            active_users,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::NotificationType;

    fn attach(
        service: &RealtimeService,
        connection_id: &str,
        user_id: &str,
    ) -> mpsc::UnboundedReceiver<RealtimeMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        service.register_connection(connection_id, user_id, tx);
        rx
    }

    #[tokio::test]
    async fn test_delivers_to_every_connection_of_a_user() {
        let service = RealtimeService::new().await.unwrap();
        let mut rx_a = attach(&service, "conn_a", "admin_1");
        let mut rx_b = attach(&service, "conn_b", "admin_1");

        let notification = Notification::new(
            "admin_1".to_string(),
            NotificationType::Comment,
            "A new review is awaiting approval".to_string(),
            Some("/admin/comments".to_string()),
        );
        let delivered = service.publish_notification(&notification).await;

        assert_eq!(delivered, 2);
        assert_eq!(rx_a.recv().await.unwrap().event, RealtimeEvent::NewNotification);
        assert_eq!(rx_b.recv().await.unwrap().event, RealtimeEvent::NewNotification);
    }

    #[tokio::test]
    async fn test_absent_recipient_is_not_an_error() {
        let service = RealtimeService::new().await.unwrap();

        let message = RealtimeMessage::new(RealtimeEvent::NewNotification, json!({}));
        let delivered = service.send_to_user("nobody", message).await;

        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_closed_connection_is_skipped() {
        let service = RealtimeService::new().await.unwrap();
        let rx = attach(&service, "conn_dead", "admin_1");
        drop(rx);

        let message = RealtimeMessage::new(RealtimeEvent::NewNotification, json!({}));
        let delivered = service.send_to_user("admin_1", message).await;

        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_unregister_clears_user_entry() {
        let service = RealtimeService::new().await.unwrap();
        let _rx = attach(&service, "conn_a", "admin_1");

        service.unregister_connection("conn_a", "admin_1");
        let stats = service.get_stats().await;

        assert_eq!(stats.total_connections, 0);
        assert_eq!(stats.active_users, 0);
    }
}
