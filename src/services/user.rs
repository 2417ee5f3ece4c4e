use crate::{
    error::{AppError, Result},
    models::user::*,
    services::{auth::AuthService, Database},
    utils::validation,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct UserService {
    db: Arc<Database>,
    auth: AuthService,
}

impl UserService {
    pub async fn new(db: Arc<Database>, auth: AuthService) -> Result<Self> {
        Ok(Self { db, auth })
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse> {
        let (username, password, role) = match (request.username, request.password, request.role) {
            (Some(username), Some(password), Some(role)) => (username, password, role),
            _ => {
                return Err(AppError::missing_fields(
                    "Username, password and role are required",
                ))
            }
        };

        validation::validate_username(&username)?;
        validation::validate_password(&password)?;

        let role = UserRole::parse(&role).ok_or_else(|| {
            AppError::validation("Invalid role. Role must be 'SUPER_ADMIN' or 'ADMIN'")
        })?;

        let existing: Option<User> = self.db.find_one("user", "username", &username).await?;
        if existing.is_some() {
            return Err(AppError::conflict("This username is already taken"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash: self.auth.hash_password(&password)?,
            role,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };

        let created: User = self.db.create("user", user).await?;
        info!("Registered user: {} ({})", created.username, created.role.as_str());

        Ok(created.to_response())
    }

    /// Verifies credentials and issues a token pair. The refresh token is
    /// persisted on the account so logout can revoke it.
    pub async fn login(&self, request: LoginRequest) -> Result<(String, String, UserResponse)> {
        let (username, password) = match (request.username, request.password) {
            (Some(username), Some(password)) => (username, password),
            _ => {
                return Err(AppError::missing_fields(
                    "Username and password are required",
                ))
            }
        };

        let user: User = self
            .db
            .find_one("user", "username", &username)
            .await?
            .ok_or_else(|| AppError::unauthorized("User not found"))?;

        if !self.auth.verify_password(&password, &user.password_hash)? {
            return Err(AppError::unauthorized("Wrong password"));
        }

        let access_token = self.auth.issue_access_token(&user)?;
        let refresh_token = self.auth.issue_refresh_token(&user)?;

        self.db
            .update_by_id_with_json::<User>(
                "user",
                &user.id,
                json!({
                    "refresh_token": refresh_token,
                    "updated_at": Utc::now(),
                }),
            )
            .await?;

        debug!("User logged in: {}", user.username);
        Ok((access_token, refresh_token, user.to_response()))
    }

    pub async fn logout(&self, user_id: &str) -> Result<()> {
        self.db
            .update_by_id_with_json::<User>(
                "user",
                user_id,
                json!({
                    "refresh_token": null,
                    "updated_at": Utc::now(),
                }),
            )
            .await?;

        Ok(())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.db.get_by_id("user", user_id).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>> {
        let query = "SELECT * FROM user ORDER BY created_at DESC";
        let mut response = self.db.query(query).await?;
        let users: Vec<User> = response.take(0)?;

        Ok(users.iter().map(User::to_response).collect())
    }

    pub async fn update_user(&self, user_id: &str, request: UpdateUserRequest) -> Result<UserResponse> {
        request.validate().map_err(AppError::ValidatorError)?;

        let user: User = self
            .db
            .get_by_id("user", user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let role = UserRole::parse(&request.role).ok_or_else(|| {
            AppError::validation("Invalid role. Role must be 'SUPER_ADMIN' or 'ADMIN'")
        })?;

        let mut updates = json!({
            "username": request.username,
            "role": role,
            "updated_at": Utc::now(),
        });

        if let Some(new_password) = &request.new_password {
            let old_password = request
                .old_password
                .as_deref()
                .ok_or_else(|| AppError::missing_fields("Old password is required"))?;

            if !self.auth.verify_password(old_password, &user.password_hash)? {
                return Err(AppError::unauthorized("Old password is wrong"));
            }

            updates["password_hash"] = json!(self.auth.hash_password(new_password)?);
        }

        let updated: User = self
            .db
            .update_by_id_with_json("user", user_id, updates)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        Ok(updated.to_response())
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.db.delete_by_id("user", user_id).await
    }

    /// Recipient resolver: every account whose role carries moderation
    /// privileges. An empty result is valid and means no one is notified.
    pub async fn find_elevated(&self) -> Result<Vec<User>> {
        let users: Vec<User> = self.db.select("user").await?;
        Ok(users
            .into_iter()
            .filter(|user| user.role.is_elevated())
            .collect())
    }
}
