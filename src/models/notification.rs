use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Comment,
    Event,
    System,
}

/// One notification record per (event, recipient) pair. Fan-out creates a
/// separate record for every recipient rather than a shared one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub notification_type: NotificationType,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: String,
        notification_type: NotificationType,
        message: String,
        link: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            notification_type,
            message,
            link,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_starts_unread() {
        let notification = Notification::new(
            "user_1".to_string(),
            NotificationType::Comment,
            "A new review is awaiting approval".to_string(),
            Some("/admin/comments".to_string()),
        );
        assert!(!notification.is_read);
        assert_eq!(notification.user_id, "user_1");
    }

    #[test]
    fn test_type_serializes_lowercase() {
        let json = serde_json::to_string(&NotificationType::Comment).unwrap();
        assert_eq!(json, "\"comment\"");
        let parsed: NotificationType = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(parsed, NotificationType::System);
    }
}
