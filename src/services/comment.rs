use crate::{
    error::{AppError, Result},
    models::book::Book,
    models::comment::*,
    models::notification::NotificationType,
    services::notification::{review_pending_message, NotificationService},
    services::Database,
};
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};
use validator::Validate;

#[derive(Clone)]
pub struct CommentService {
    db: Arc<Database>,
    notifications: NotificationService,
}

impl CommentService {
    pub async fn new(db: Arc<Database>, notifications: NotificationService) -> Result<Self> {
        Ok(Self { db, notifications })
    }

    /// Accepts a public review submission.
    ///
    /// Validation order: required fields, then the referenced book, then
    /// field constraints. The review is persisted in the pending state;
    /// moderator notification fan-out runs strictly after the write and
    /// behind its own failure boundary, so a dispatch error can never fail
    /// or roll back an accepted submission.
    pub async fn create_comment(&self, request: CreateCommentRequest) -> Result<Comment> {
        let (book_id, rating, content) = match (&request.book_id, request.rating, &request.content)
        {
            (Some(book_id), Some(rating), Some(content)) if !content.trim().is_empty() => {
                (book_id.clone(), rating, content.clone())
            }
            _ => {
                return Err(AppError::missing_fields(
                    "Book id, rating and review text are required",
                ))
            }
        };

        let book: Book = self
            .db
            .get_by_id("book", &book_id)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;

        request.validate().map_err(AppError::ValidatorError)?;

        debug!("Creating review for book: {}", book_id);

        let comment = Comment::new(
            book_id,
            rating,
            content,
            request.is_anonymous,
            request.name.clone(),
            request.city.clone(),
        );

        let created: Comment = self.db.create("comment", comment).await?;

        let message = review_pending_message(created.submitter_display(), &book.title);
        if let Err(e) = self
            .notifications
            .dispatch_to_elevated(
                NotificationType::Comment,
                &message,
                Some(&self.db.config.moderation_queue_link),
            )
            .await
        {
            error!("Failed to dispatch review notifications: {}", e);
        }

        Ok(created)
    }

    pub async fn list_pending(&self) -> Result<Vec<CommentWithBook>> {
        self.list_by_status(ModerationStatus::Pending).await
    }

    pub async fn list_approved(&self) -> Result<Vec<CommentWithBook>> {
        self.list_by_status(ModerationStatus::Approved).await
    }

    pub async fn count_pending(&self) -> Result<i64> {
        self.count_by_status(ModerationStatus::Pending).await
    }

    pub async fn count_approved(&self) -> Result<i64> {
        self.count_by_status(ModerationStatus::Approved).await
    }

    /// Applies a moderation action. The target status must parse before
    /// the record is looked up, so an invalid status never reads state;
    /// re-applying a previous action is accepted and idempotent.
    pub async fn set_status(&self, comment_id: &str, status: &str) -> Result<Comment> {
        let status = ModerationStatus::parse_action(status)?;

        let comment: Comment = self
            .db
            .get_by_id("comment", comment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment"))?;

        let updated: Comment = self
            .db
            .update_by_id_with_json(
                "comment",
                &comment.id,
                json!({
                    "status": status,
                    "updated_at": Utc::now(),
                }),
            )
            .await?
            .ok_or_else(|| AppError::not_found("Comment"))?;

        debug!("Review {} moderated to {}", updated.id, status.as_str());
        Ok(updated)
    }

    async fn list_by_status(&self, status: ModerationStatus) -> Result<Vec<CommentWithBook>> {
        let query = r#"
            SELECT * FROM comment
            WHERE status = $status
            ORDER BY created_at DESC
        "#;

        let mut response = self
            .db
            .query_with_params(query, json!({ "status": status }))
            .await?;
        let comments: Vec<Comment> = response.take(0)?;

        let titles = self.get_book_titles(&comments).await?;

        Ok(comments
            .into_iter()
            .map(|comment| {
                let book_title = titles.get(&comment.book_id).cloned().unwrap_or_default();
                CommentWithBook { comment, book_title }
            })
            .collect())
    }

    async fn count_by_status(&self, status: ModerationStatus) -> Result<i64> {
        self.db
            .count_where("comment", "status = $status", json!({ "status": status }))
            .await
    }

    async fn get_book_titles(&self, comments: &[Comment]) -> Result<HashMap<String, String>> {
        let mut titles = HashMap::new();

        for comment in comments {
            if titles.contains_key(&comment.book_id) {
                continue;
            }
            let book: Option<Book> = self.db.get_by_id("book", &comment.book_id).await?;
            if let Some(book) = book {
                titles.insert(comment.book_id.clone(), book.title);
            }
        }

        Ok(titles)
    }
}
