use crate::{
    config::Config,
    error::{AppError, Result},
    models::user::{User, UserRole},
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Clone)]
pub struct AuthService {
    config: Config,
}

/// Access token claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

/// Refresh token claims. Carries no role; the role is re-read from the
/// account when a new access token is issued.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// The authenticated principal, as recovered from a verified access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub role: UserRole,
}

impl AuthService {
    pub async fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
        })
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    pub fn issue_access_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            role: user.role,
            exp: (now + Duration::seconds(self.config.jwt_access_expiry_secs)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(AppError::from)
    }

    pub fn issue_refresh_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user.id.clone(),
            exp: (now + Duration::seconds(self.config.jwt_refresh_expiry_secs)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(AppError::from)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.config.jwt_secret.as_ref());
        let validation = Validation::new(Algorithm::HS256);

        match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(token_data) => {
                debug!("Access token verified for user: {}", token_data.claims.sub);
                Ok(token_data.claims)
            }
            Err(e) if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature) => {
                Err(AppError::TokenExpired)
            }
            Err(e) => {
                warn!("Access token verification failed: {}", e);
                Err(AppError::Authentication("Invalid token".to_string()))
            }
        }
    }
}

// Axum extractor for the authenticated principal. The auth middleware
// inserts AuthUser into request extensions after verifying the token.
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Authentication("Authentication required".to_string()))
    }
}

/// Rejects callers whose role carries no moderation privileges.
#[macro_export]
macro_rules! require_elevated {
    ($user:expr) => {
        if !$user.role.is_elevated() {
            return Err($crate::error::AppError::Authorization(
                "You are not authorized to perform this action".to_string(),
            ));
        }
    };
}

/// Rejects callers other than the super admin.
#[macro_export]
macro_rules! require_super_admin {
    ($user:expr) => {
        if $user.role != $crate::models::user::UserRole::SuperAdmin {
            return Err($crate::error::AppError::Authorization(
                "You are not authorized to perform this action".to_string(),
            ));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 3001,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            database_url: "http://localhost:8000".to_string(),
            database_namespace: "inkshelf".to_string(),
            database_name: "test".to_string(),
            database_username: "root".to_string(),
            database_password: "root".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_access_expiry_secs: 3600,
            jwt_refresh_expiry_secs: 86400,
            max_comment_length: 5000,
            moderation_queue_link: "/admin/comments".to_string(),
            rate_limit_requests: 100,
            cors_allowed_origins: "http://localhost:3000".to_string(),
        }
    }

    fn test_user(role: UserRole) -> User {
        User {
            id: "user_1".to_string(),
            username: "selin".to_string(),
            password_hash: String::new(),
            role,
            refresh_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_password_hash_round_trip() {
        let auth = AuthService::new(&test_config()).await.unwrap();

        let hash = auth.hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(auth.verify_password("correct horse", &hash).unwrap());
        assert!(!auth.verify_password("wrong horse", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_access_token_round_trip() {
        let auth = AuthService::new(&test_config()).await.unwrap();
        let user = test_user(UserRole::Admin);

        let token = auth.issue_access_token(&user).unwrap();
        let claims = auth.verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, "user_1");
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_tampered_token_is_rejected() {
        let auth = AuthService::new(&test_config()).await.unwrap();
        let user = test_user(UserRole::SuperAdmin);

        let mut token = auth.issue_access_token(&user).unwrap();
        token.push('x');

        assert!(matches!(
            auth.verify_access_token(&token),
            Err(AppError::Authentication(_))
        ));
    }
}
