use crate::{
    error::{AppError, Result},
    models::notification::{Notification, NotificationType},
    services::{realtime::RealtimeService, user::UserService, Database},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct NotificationService {
    db: Arc<Database>,
    users: UserService,
    realtime: RealtimeService,
}

/// Message shown to moderators when a review enters the queue.
pub fn review_pending_message(submitter: &str, book_title: &str) -> String {
    format!(
        "A new review by {} for '{}' is awaiting approval.",
        submitter, book_title
    )
}

impl NotificationService {
    pub async fn new(
        db: Arc<Database>,
        users: UserService,
        realtime: RealtimeService,
    ) -> Result<Self> {
        Ok(Self { db, users, realtime })
    }

    /// Fans an event out to every elevated account: one persisted record
    /// per recipient, then a best-effort realtime push of that record.
    ///
    /// Errors only when the recipient set cannot be resolved at all. A
    /// failed write for one recipient is logged and skipped; that
    /// recipient simply gets no record. Delivery failures never surface:
    /// the persisted record stays queryable either way.
    pub async fn dispatch_to_elevated(
        &self,
        notification_type: NotificationType,
        message: &str,
        link: Option<&str>,
    ) -> Result<usize> {
        let recipients = self.users.find_elevated().await?;

        if recipients.is_empty() {
            debug!("No elevated accounts to notify");
            return Ok(0);
        }

        let mut created = 0;
        for recipient in &recipients {
            let notification = Notification::new(
                recipient.id.clone(),
                notification_type,
                message.to_string(),
                link.map(String::from),
            );

            let persisted: Notification = match self.db.create("notification", notification).await {
                Ok(persisted) => persisted,
                Err(e) => {
                    error!(
                        "Failed to create notification for user {}: {}",
                        recipient.id, e
                    );
                    continue;
                }
            };
            created += 1;

            let delivered = self.realtime.publish_notification(&persisted).await;
            debug!(
                "Pushed notification {} to {} live session(s) of user {}",
                persisted.id, delivered, recipient.id
            );
        }

        info!(
            "Dispatched '{}' notification to {}/{} elevated accounts",
            message,
            created,
            recipients.len()
        );
        Ok(created)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        let query = r#"
            SELECT * FROM notification
            WHERE user_id = $user_id
            ORDER BY created_at DESC
        "#;

        let mut response = self
            .db
            .query_with_params(query, json!({ "user_id": user_id }))
            .await?;
        let notifications: Vec<Notification> = response.take(0)?;

        Ok(notifications)
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<i64> {
        self.db
            .count_where(
                "notification",
                "user_id = $user_id AND is_read = false",
                json!({ "user_id": user_id }),
            )
            .await
    }

    /// Marks one notification read. Scoped to the owning recipient: a
    /// record that exists but belongs to someone else reads as not found.
    pub async fn mark_read(&self, user_id: &str, notification_id: &str) -> Result<Notification> {
        let notification: Notification = self
            .db
            .get_by_id("notification", notification_id)
            .await?
            .filter(|n: &Notification| n.user_id == user_id)
            .ok_or_else(|| AppError::not_found("Notification"))?;

        let updated: Notification = self
            .db
            .update_by_id_with_json("notification", &notification.id, json!({ "is_read": true }))
            .await?
            .ok_or_else(|| AppError::not_found("Notification"))?;

        Ok(updated)
    }

    /// Marks every unread notification of a recipient read and returns
    /// how many records were modified. Other recipients are untouched.
    pub async fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        let query = r#"
            UPDATE notification SET is_read = true
            WHERE user_id = $user_id AND is_read = false
            RETURN AFTER
        "#;

        let mut response = self
            .db
            .query_with_params(query, json!({ "user_id": user_id }))
            .await?;
        let updated: Vec<Notification> = response.take(0)?;

        debug!("Marked {} notifications read for user {}", updated.len(), user_id);
        Ok(updated.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_pending_message_interpolates_title_and_submitter() {
        let message = review_pending_message("Deniz", "Kara Kitap");
        assert_eq!(
            message,
            "A new review by Deniz for 'Kara Kitap' is awaiting approval."
        );

        let message = review_pending_message("Anonymous", "Snow");
        assert!(message.contains("Anonymous"));
        assert!(message.contains("'Snow'"));
    }
}
