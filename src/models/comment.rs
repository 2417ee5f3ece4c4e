use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};

/// Moderation state of a reader review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    /// Parses a moderation action. Only "approved" and "rejected" are
    /// valid targets; a comment can never be moved back to pending.
    pub fn parse_action(value: &str) -> Result<Self> {
        match value {
            "approved" => Ok(ModerationStatus::Approved),
            "rejected" => Ok(ModerationStatus::Rejected),
            other => Err(AppError::InvalidStatus(format!(
                "Invalid status value '{}'. Status must be 'approved' or 'rejected'",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub book_id: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub rating: f64,
    pub content: String,
    pub is_anonymous: bool,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Builds a new review in the pending state. Name and city are only
    /// carried over for non-anonymous submissions; anonymous reviews never
    /// persist them, even when the request supplied both.
    pub fn new(
        book_id: String,
        rating: f64,
        content: String,
        is_anonymous: bool,
        name: Option<String>,
        city: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            book_id,
            name: if is_anonymous { None } else { name },
            city: if is_anonymous { None } else { city },
            rating,
            content,
            is_anonymous,
            status: ModerationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Display name used in notification messages.
    pub fn submitter_display(&self) -> &str {
        if self.is_anonymous {
            "Anonymous"
        } else {
            self.name.as_deref().unwrap_or("Anonymous")
        }
    }
}

/// Review annotated with the referenced book's title, as served to the
/// moderation queue and the public review listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWithBook {
    #[serde(flatten)]
    pub comment: Comment,
    pub book_title: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub book_id: Option<String>,
    #[validate(range(min = 0.5, max = 5.0, message = "Rating must be between 0.5 and 5"))]
    pub rating: Option<f64>,
    #[validate(length(min = 1, max = 5000, message = "Review text must not be empty"))]
    pub content: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    pub name: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommentStatusRequest {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_rating(rating: f64) -> CreateCommentRequest {
        CreateCommentRequest {
            book_id: Some("book_1".to_string()),
            rating: Some(rating),
            content: Some("A wonderful read.".to_string()),
            is_anonymous: false,
            name: Some("Deniz".to_string()),
            city: Some("Izmir".to_string()),
        }
    }

    #[test]
    fn test_new_comment_is_pending() {
        let comment = Comment::new(
            "book_1".to_string(),
            4.5,
            "Loved it".to_string(),
            false,
            Some("Deniz".to_string()),
            None,
        );
        assert_eq!(comment.status, ModerationStatus::Pending);
    }

    #[test]
    fn test_anonymous_comment_never_keeps_name_or_city() {
        let comment = Comment::new(
            "book_1".to_string(),
            3.0,
            "Fine".to_string(),
            true,
            Some("Deniz".to_string()),
            Some("Izmir".to_string()),
        );
        assert!(comment.name.is_none());
        assert!(comment.city.is_none());
        assert_eq!(comment.submitter_display(), "Anonymous");
    }

    #[test]
    fn test_named_comment_keeps_name_and_city() {
        let comment = Comment::new(
            "book_1".to_string(),
            3.0,
            "Fine".to_string(),
            false,
            Some("Deniz".to_string()),
            Some("Izmir".to_string()),
        );
        assert_eq!(comment.name.as_deref(), Some("Deniz"));
        assert_eq!(comment.city.as_deref(), Some("Izmir"));
        assert_eq!(comment.submitter_display(), "Deniz");
    }

    #[test]
    fn test_rating_bounds() {
        assert!(request_rating(0.0).validate().is_err());
        assert!(request_rating(0.5).validate().is_ok());
        assert!(request_rating(5.0).validate().is_ok());
        assert!(request_rating(5.5).validate().is_err());
    }

    #[test]
    fn test_parse_action_accepts_only_moderation_targets() {
        assert_eq!(
            ModerationStatus::parse_action("approved").unwrap(),
            ModerationStatus::Approved
        );
        assert_eq!(
            ModerationStatus::parse_action("rejected").unwrap(),
            ModerationStatus::Rejected
        );
        assert!(matches!(
            ModerationStatus::parse_action("archived"),
            Err(AppError::InvalidStatus(_))
        ));
        assert!(matches!(
            ModerationStatus::parse_action("pending"),
            Err(AppError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ModerationStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }
}
