use crate::error::{AppError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Validates an account username.
pub fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".to_string()));
    }

    if username.len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters".to_string(),
        ));
    }

    if username.len() > 30 {
        return Err(AppError::Validation(
            "Username must be at most 30 characters".to_string(),
        ));
    }

    static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
    let pattern = USERNAME_RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

    if !pattern.is_match(username) {
        return Err(AppError::Validation(
            "Username may only contain letters, digits, underscores and hyphens".to_string(),
        ));
    }

    Ok(())
}

/// Validates an account password.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("selin").is_ok());
        assert!(validate_username("site-admin_01").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(31)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("12345").is_err());
    }
}
