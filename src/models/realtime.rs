use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::notification::Notification;

/// Events carried over the realtime channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RealtimeEvent {
    Connect,
    Ping,
    Pong,
    NewNotification,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeMessage {
    pub id: String,
    pub event: RealtimeEvent,
    pub channel: Option<String>,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl RealtimeMessage {
    pub fn new(event: RealtimeEvent, data: serde_json::Value) -> Self {
        Self {
            id: format!("msg_{}", uuid::Uuid::new_v4()),
            event,
            channel: None,
            data,
            timestamp: Utc::now(),
        }
    }

    /// A `new_notification` push addressed to the recipient's channel,
    /// carrying the persisted notification record as payload.
    pub fn notification(notification: &Notification) -> Self {
        Self {
            id: format!("msg_{}", uuid::Uuid::new_v4()),
            event: RealtimeEvent::NewNotification,
            channel: Some(user_channel(&notification.user_id)),
            data: serde_json::to_value(notification).unwrap_or_default(),
            timestamp: Utc::now(),
        }
    }

    pub fn pong(connection_id: &str) -> Self {
        Self::new(
            RealtimeEvent::Pong,
            serde_json::json!({ "connection_id": connection_id }),
        )
    }
}

/// Channel key for a recipient's notification stream.
pub fn user_channel(user_id: &str) -> String {
    format!("user_notifications:{}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::NotificationType;

    #[test]
    fn test_user_channel_name() {
        assert_eq!(user_channel("user_123"), "user_notifications:user_123");
    }

    #[test]
    fn test_notification_message_targets_recipient_channel() {
        let notification = Notification::new(
            "user_123".to_string(),
            NotificationType::Comment,
            "A new review is awaiting approval".to_string(),
            Some("/admin/comments".to_string()),
        );

        let message = RealtimeMessage::notification(&notification);
        assert_eq!(message.event, RealtimeEvent::NewNotification);
        assert_eq!(message.channel.as_deref(), Some("user_notifications:user_123"));
        assert_eq!(message.data["message"], "A new review is awaiting approval");
    }

    #[test]
    fn test_event_serializes_snake_case() {
        let json = serde_json::to_string(&RealtimeEvent::NewNotification).unwrap();
        assert_eq!(json, "\"new_notification\"");
    }
}
