use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User entity as stored in the database.
///
/// `password_hash` holds the bcrypt digest, never the submitted plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration request
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Optional display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
    /// Email address (unique across users)
    #[validate(email(message = "Email must be a valid email address"))]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Plaintext password; hashed before storage, never persisted or logged
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be between 8 and 128 characters"
    ))]
    pub password: String,
}

/// Registration response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
}

/// User information returned by the API (no credential material)
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            name: Some("Ada".to_string()),
            email: "ada@example.com".to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let mut req = valid_request();
        req.email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let mut req = valid_request();
        req.password = "short".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_user_response_excludes_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: None,
            email: "ada@example.com".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let response = UserResponse::from(user.clone());
        let json = serde_json::to_value(&response).expect("serialize");
        assert!(json.get("password_hash").is_none());
        assert_eq!(
            json.get("email").and_then(|v| v.as_str()),
            Some("ada@example.com")
        );
    }
}
