// src/models/user.rs
// DOCUMENTATION: User data structures
// PURPOSE: Database model and request/response DTOs for the users resource

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{Photo, Post};

/// A user record from the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Minimal user shape embedded in post and photo responses
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// List item: a user plus how many posts and photos they own
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserWithCounts {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub post_count: i64,
    pub photo_count: i64,
}

/// Detail response: the user, their newest posts and photos, and counts
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub posts: Vec<Post>,
    pub photos: Vec<Photo>,
    pub post_count: i64,
    pub photo_count: i64,
}

/// Request DTO for POST /api/users and PUT /api/users/{id}
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserRequest {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: String,

    #[validate(email(message = "Email is not valid"))]
    pub email: String,

    #[validate(range(min = 1, max = 150, message = "Age must be between 1 and 150"))]
    pub age: Option<i32>,

    pub bio: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_request_validation() {
        let valid = UserRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            age: Some(30),
            bio: None,
        };
        assert!(valid.validate().is_ok());

        let short_name = UserRequest {
            name: "Al".to_string(),
            ..valid.clone()
        };
        assert!(short_name.validate().is_err());

        let bad_email = UserRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let bad_age = UserRequest {
            age: Some(200),
            ..valid
        };
        assert!(bad_age.validate().is_err());
    }
}
