use crate::{
    error::{AppError, Result},
    models::book::*,
    models::category::Category,
    services::Database,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct BookService {
    db: Arc<Database>,
}

impl BookService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    pub async fn create_book(&self, request: CreateBookRequest) -> Result<BookWithCategory> {
        request.validate().map_err(AppError::ValidatorError)?;

        let category: Category = self
            .db
            .get_by_id("category", &request.category_id)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;

        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4().to_string(),
            title: request.title,
            category_id: request.category_id,
            year: request.year,
            description: request.description,
            long_description: request.long_description,
            pages: request.pages,
            publisher: request.publisher,
            isbn: request.isbn,
            status: request.status.unwrap_or(BookStatus::Draft),
            cover_image_url: request.cover_image_url,
            additional_images: request.additional_images,
            awards: request.awards,
            buy_links: request.buy_links,
            seo_title: request.seo_title,
            seo_description: request.seo_description,
            seo_keywords: request.seo_keywords,
            average_rating: 0.0,
            total_ratings: 0,
            created_at: now,
            updated_at: now,
        };

        let created: Book = self.db.create("book", book).await?;
        debug!("Created book: {} ({})", created.title, created.id);

        Ok(BookWithCategory {
            book: created,
            category: Some(category),
        })
    }

    pub async fn get_book(&self, book_id: &str) -> Result<BookWithCategory> {
        let book: Book = self
            .db
            .get_by_id("book", book_id)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;

        let category: Option<Category> = self.db.get_by_id("category", &book.category_id).await?;

        Ok(BookWithCategory { book, category })
    }

    pub async fn list_books(&self, query: BookListQuery) -> Result<Vec<BookWithCategory>> {
        let mut sql = String::from("SELECT * FROM book");
        if query.category_id.is_some() {
            sql.push_str(" WHERE category_id = $category_id");
        }
        sql.push_str(" ORDER BY created_at DESC");
        if let Some(limit) = query.limit {
            if limit > 0 {
                sql.push_str(&format!(" LIMIT {}", limit));
            }
        }

        let mut response = self
            .db
            .query_with_params(&sql, json!({ "category_id": query.category_id }))
            .await?;
        let books: Vec<Book> = response.take(0)?;

        let mut annotated = Vec::with_capacity(books.len());
        for book in books {
            let category: Option<Category> =
                self.db.get_by_id("category", &book.category_id).await?;
            annotated.push(BookWithCategory { book, category });
        }

        Ok(annotated)
    }

    pub async fn count_books(&self) -> Result<i64> {
        self.db.count_where("book", "true", json!({})).await
    }
}
