use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Draft,
    Published,
    Upcoming,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Award {
    pub name: String,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub category_id: String,
    pub year: Option<String>,
    pub description: String,
    pub long_description: Option<String>,
    pub pages: Option<i64>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub status: BookStatus,
    pub cover_image_url: String,
    pub additional_images: Vec<String>,
    pub awards: Vec<Award>,
    pub buy_links: Vec<BuyLink>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book annotated with its category, as served by the catalog listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookWithCategory {
    #[serde(flatten)]
    pub book: Book,
    pub category: Option<super::category::Category>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookRequest {
    #[validate(length(min = 2, message = "Title must be at least 2 characters"))]
    pub title: String,
    pub category_id: String,
    pub year: Option<String>,
    #[validate(length(min = 1, max = 150, message = "Description must be at most 150 characters"))]
    pub description: String,
    pub long_description: Option<String>,
    pub pages: Option<i64>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub status: Option<BookStatus>,
    #[validate(length(min = 1, message = "Cover image is required"))]
    pub cover_image_url: String,
    #[serde(default)]
    pub additional_images: Vec<String>,
    #[serde(default)]
    pub awards: Vec<Award>,
    #[serde(default)]
    pub buy_links: Vec<BuyLink>,
    pub seo_title: Option<String>,
    #[validate(length(max = 160, message = "SEO description must be at most 160 characters"))]
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookListQuery {
    pub category_id: Option<String>,
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_field_constraints() {
        let request = CreateBookRequest {
            title: "K".to_string(),
            category_id: "cat_1".to_string(),
            year: None,
            description: "A short description".to_string(),
            long_description: None,
            pages: None,
            publisher: None,
            isbn: None,
            status: None,
            cover_image_url: "https://cdn.example.com/cover.jpg".to_string(),
            additional_images: vec![],
            awards: vec![],
            buy_links: vec![],
            seo_title: None,
            seo_description: None,
            seo_keywords: None,
        };
        assert!(request.validate().is_err());

        let request = CreateBookRequest {
            title: "Kara Kitap".to_string(),
            ..request
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_book_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BookStatus::Upcoming).unwrap(),
            "\"upcoming\""
        );
    }
}
