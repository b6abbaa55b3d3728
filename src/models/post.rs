// src/models/post.rs
// DOCUMENTATION: Post data structures
// PURPOSE: Database model and request/response DTOs for the posts resource

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{PageQuery, Photo, UserSummary};

/// A post record from the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Minimal post shape embedded in photo responses
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostSummary {
    pub id: i32,
    pub title: String,
}

/// Post response with the owning user summary and photo count embedded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    #[serde(flatten)]
    pub post: Post,
    pub user: UserSummary,
    pub photo_count: i64,
}

/// Detail response: the post, its owner and every attached photo
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub user: UserSummary,
    pub photos: Vec<Photo>,
    pub photo_count: i64,
}

/// Request DTO for POST /api/posts
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,

    #[validate(length(min = 10, message = "Content must be at least 10 characters"))]
    pub content: String,

    pub published: Option<bool>,

    pub user_id: i32,
}

/// Request DTO for PUT /api/posts/{id}
/// DOCUMENTATION: Ownership never changes on update, so no user_id here
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,

    #[validate(length(min = 10, message = "Content must be at least 10 characters"))]
    pub content: String,

    pub published: Option<bool>,
}

/// Query string for GET /api/posts
/// DOCUMENTATION: Pagination plus the optional published equality filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub published: Option<String>,
}

impl ListPostsQuery {
    /// Parse the published filter; anything other than "true"/"false" means no filter
    pub fn published_filter(&self) -> Option<bool> {
        match self.published.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_request_validation() {
        let valid = CreatePostRequest {
            title: "Hello world".to_string(),
            content: "This content is long enough.".to_string(),
            published: Some(true),
            user_id: 1,
        };
        assert!(valid.validate().is_ok());

        let short_title = CreatePostRequest {
            title: "Hi".to_string(),
            ..valid.clone()
        };
        assert!(short_title.validate().is_err());

        let short_content = CreatePostRequest {
            content: "too short".to_string(),
            ..valid
        };
        assert!(short_content.validate().is_err());
    }

    #[test]
    fn test_published_filter_parsing() {
        let mut query = ListPostsQuery::default();
        assert_eq!(query.published_filter(), None);

        query.published = Some("true".to_string());
        assert_eq!(query.published_filter(), Some(true));

        query.published = Some("false".to_string());
        assert_eq!(query.published_filter(), Some(false));

        query.published = Some("yes".to_string());
        assert_eq!(query.published_filter(), None);
    }
}
