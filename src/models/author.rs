use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub icon: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BioParagraph {
    pub title: String,
    pub content: String,
}

/// The site's single author profile. There is exactly one record; the
/// update endpoint creates it on first write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub id: String,
    pub author_name: String,
    pub title: String,
    pub title_icon: String,
    pub short_bio: String,
    pub profile_image_url: String,
    pub page_title: String,
    pub favicon_url: String,
    pub show_badges: bool,
    pub badges: Vec<Badge>,
    pub long_bio: String,
    pub use_bio_image: bool,
    pub bio_image_url: String,
    pub use_bio_paragraphs: bool,
    pub bio_paragraphs: Vec<BioParagraph>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub author_name: Option<String>,
    pub title: Option<String>,
    pub title_icon: Option<String>,
    #[validate(length(max = 200, message = "Short bio must be at most 200 characters"))]
    pub short_bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub page_title: Option<String>,
    pub favicon_url: Option<String>,
    pub show_badges: Option<bool>,
    pub badges: Option<Vec<Badge>>,
    #[validate(length(min = 10, message = "Long bio must be at least 10 characters"))]
    pub long_bio: Option<String>,
    pub use_bio_image: Option<bool>,
    pub bio_image_url: Option<String>,
    pub use_bio_paragraphs: Option<bool>,
    pub bio_paragraphs: Option<Vec<BioParagraph>>,
}

impl UpdateProfileRequest {
    /// The fields the profile contract treats as mandatory.
    pub fn has_required_fields(&self) -> bool {
        self.author_name.is_some()
            && self.title.is_some()
            && self.short_bio.is_some()
            && self.long_bio.is_some()
            && self.page_title.is_some()
    }
}
