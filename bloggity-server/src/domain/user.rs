use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) password: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = normalize_username(&self.username)?;
        let first_name = normalize_name("first_name", &self.first_name)?;
        let last_name = normalize_name("last_name", &self.last_name)?;
        validate_password(&self.password)?;
        Ok(Self {
            username,
            first_name,
            last_name,
            password: self.password,
        })
    }
}

/// Full replacement of a user's profile; `password` is only changed when
/// present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UpdateUserRequest {
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) password: Option<String>,
}

impl UpdateUserRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = normalize_username(&self.username)?;
        let first_name = normalize_name("first_name", &self.first_name)?;
        let last_name = normalize_name("last_name", &self.last_name)?;
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        Ok(Self {
            username,
            first_name,
            last_name,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = self.username.trim();
        if username.is_empty() || username.chars().count() > 150 {
            return Err(DomainError::Validation {
                field: "username",
                message: "must be 1..150 chars",
            });
        }

        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(Self {
            username: username.to_string(),
            password: self.password,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        let username = normalize_username(&username.into())?;
        let first_name = normalize_name("first_name", &first_name.into())?;
        let last_name = normalize_name("last_name", &last_name.into())?;

        Ok(Self {
            id,
            username,
            first_name,
            last_name,
            created_at,
        })
    }
}

fn normalize_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    let len = username.chars().count();
    if len == 0 || len > 150 {
        return Err(DomainError::Validation {
            field: "username",
            message: "must be 1..150 chars",
        });
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(DomainError::Validation {
            field: "username",
            message: "may contain only letters, digits and @/./+/-/_",
        });
    }
    Ok(username.to_string())
}

fn normalize_name(field: &'static str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > 30 {
        return Err(DomainError::Validation {
            field,
            message: "must be 1..30 chars",
        });
    }
    Ok(value.to_string())
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    let password_len = password.chars().count();
    if !(8..=128).contains(&password_len) {
        return Err(DomainError::Validation {
            field: "password",
            message: "must be 8..128 chars",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{RegisterRequest, UpdateUserRequest, User, normalize_name, normalize_username};
    use chrono::Utc;

    #[test]
    fn user_new_rejects_non_positive_id() {
        let result = User::new(0, "valid_user", "Ada", "Lovelace", Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn username_rules_are_applied() {
        assert!(normalize_username("").is_err());
        assert!(normalize_username("has space").is_err());
        assert!(normalize_username(&"a".repeat(151)).is_err());
        assert_eq!(
            normalize_username("  ada.l+blog@home  ").expect("must be valid"),
            "ada.l+blog@home"
        );
    }

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(normalize_name("first_name", "  Ada ").expect("valid"), "Ada");
        assert!(normalize_name("first_name", "   ").is_err());
        assert!(normalize_name("last_name", &"x".repeat(31)).is_err());
    }

    #[test]
    fn register_password_length_is_checked() {
        let short = RegisterRequest {
            username: "valid_user".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: "short".to_string(),
        };
        assert!(short.validate().is_err());

        let ok = RegisterRequest {
            username: " valid_user ".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: "very-secure-password".to_string(),
        };
        let validated = ok.validate().expect("must be valid");
        assert_eq!(validated.username, "valid_user");
    }

    #[test]
    fn update_without_password_is_valid() {
        let req = UpdateUserRequest {
            username: "valid_user".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Byron".to_string(),
            password: None,
        };
        let validated = req.validate().expect("must be valid");
        assert!(validated.password.is_none());
    }

    #[test]
    fn update_with_short_password_is_rejected() {
        let req = UpdateUserRequest {
            username: "valid_user".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Byron".to_string(),
            password: Some("short".to_string()),
        };
        assert!(req.validate().is_err());
    }
}
