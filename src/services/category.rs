use crate::{
    error::{AppError, Result},
    models::category::*,
    services::Database,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct CategoryService {
    db: Arc<Database>,
}

impl CategoryService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let query = "SELECT * FROM category ORDER BY name ASC";
        let mut response = self.db.query(query).await?;
        let categories: Vec<Category> = response.take(0)?;
        Ok(categories)
    }

    pub async fn get_category(&self, category_id: &str) -> Result<Category> {
        self.db
            .get_by_id("category", category_id)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))
    }

    pub async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category> {
        let name = request
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::missing_fields("Category name is required"))?;

        let existing: Option<Category> = self.db.find_one("category", "name", &name).await?;
        if existing.is_some() {
            return Err(AppError::conflict("This category name is already in use"));
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name,
            description: request.description,
            created_at: now,
            updated_at: now,
        };

        let created: Category = self.db.create("category", category).await?;
        debug!("Created category: {}", created.name);
        Ok(created)
    }

    pub async fn update_category(
        &self,
        category_id: &str,
        request: UpdateCategoryRequest,
    ) -> Result<Category> {
        request.validate().map_err(AppError::ValidatorError)?;

        let _existing: Category = self
            .db
            .get_by_id("category", category_id)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;

        let updated: Category = self
            .db
            .update_by_id_with_json(
                "category",
                category_id,
                json!({
                    "name": request.name,
                    "description": request.description,
                    "updated_at": Utc::now(),
                }),
            )
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;

        Ok(updated)
    }

    pub async fn delete_category(&self, category_id: &str) -> Result<()> {
        let _existing: Category = self
            .db
            .get_by_id("category", category_id)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;

        self.db.delete_by_id("category", category_id).await
    }
}
