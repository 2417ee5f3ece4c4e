use crate::{
    error::{AppError, Result},
    models::author::*,
    services::Database,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct AuthorService {
    db: Arc<Database>,
}

impl AuthorService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    pub async fn get_profile(&self) -> Result<AuthorProfile> {
        let profiles: Vec<AuthorProfile> = self.db.select("author_profile").await?;
        profiles
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found("Profile"))
    }

    /// Creates or replaces the single author profile.
    pub async fn update_profile(&self, request: UpdateProfileRequest) -> Result<AuthorProfile> {
        if !request.has_required_fields() {
            return Err(AppError::missing_fields(
                "Author name, title, short bio, long bio and page title are required",
            ));
        }

        request.validate().map_err(AppError::ValidatorError)?;

        let existing: Option<AuthorProfile> = self
            .db
            .select("author_profile")
            .await?
            .into_iter()
            .next();

        let now = Utc::now();
        let (id, created_at) = match &existing {
            Some(profile) => (profile.id.clone(), profile.created_at),
            None => (Uuid::new_v4().to_string(), now),
        };

        let profile = AuthorProfile {
            id: id.clone(),
            author_name: request.author_name.unwrap_or_default(),
            title: request.title.unwrap_or_default(),
            title_icon: request.title_icon.unwrap_or_else(|| "award".to_string()),
            short_bio: request.short_bio.unwrap_or_default(),
            profile_image_url: request.profile_image_url.unwrap_or_default(),
            page_title: request.page_title.unwrap_or_default(),
            favicon_url: request.favicon_url.unwrap_or_default(),
            show_badges: request.show_badges.unwrap_or(false),
            badges: request.badges.unwrap_or_default(),
            long_bio: request.long_bio.unwrap_or_default(),
            use_bio_image: request.use_bio_image.unwrap_or(false),
            bio_image_url: request.bio_image_url.unwrap_or_default(),
            use_bio_paragraphs: request.use_bio_paragraphs.unwrap_or(false),
            bio_paragraphs: request.bio_paragraphs.unwrap_or_default(),
            created_at,
            updated_at: now,
        };

        let saved: AuthorProfile = if existing.is_some() {
            self.db
                .update_by_id_with_json(
                    "author_profile",
                    &id,
                    serde_json::to_value(&profile).map_err(AppError::Serialization)?,
                )
                .await?
                .ok_or_else(|| AppError::not_found("Profile"))?
        } else {
            self.db.create("author_profile", profile).await?
        };

        debug!("Author profile updated: {}", saved.author_name);
        Ok(saved)
    }
}
