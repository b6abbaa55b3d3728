// src/db/post_repository.rs
// DOCUMENTATION: Post database operations
// PURPOSE: Abstract database operations from business logic

use crate::errors::ApiError;
use crate::models::{
    CreatePostRequest, PageParams, Post, PostResponse, UpdatePostRequest, UserSummary,
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

/// Internal struct for mapping joined post rows
/// DOCUMENTATION: Carries the owning user summary and photo count alongside
/// the post columns
#[derive(Debug, FromRow)]
struct PostRow {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
    pub photo_count: i64,
}

impl PostRow {
    fn to_response(self) -> PostResponse {
        PostResponse {
            user: UserSummary {
                id: self.user_id,
                name: self.user_name,
                email: self.user_email,
            },
            post: Post {
                id: self.id,
                title: self.title,
                content: self.content,
                published: self.published,
                user_id: self.user_id,
                created_at: self.created_at,
            },
            photo_count: self.photo_count,
        }
    }
}

const POST_SELECT: &str = r#"
    SELECT
        p.id, p.title, p.content, p.published, p.user_id, p.created_at,
        u.name AS user_name, u.email AS user_email,
        (SELECT COUNT(*) FROM photos ph WHERE ph.post_id = p.id) AS photo_count
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

pub struct PostRepository;

impl PostRepository {
    /// Create new post in database
    /// DOCUMENTATION: Inserts post and returns created record with its owner
    /// Used by POST /api/posts endpoint
    pub async fn create_post(
        pool: &PgPool,
        req: &CreatePostRequest,
    ) -> Result<PostResponse, ApiError> {
        let inserted: (i32,) = sqlx::query_as(
            r#"
            INSERT INTO posts (title, content, published, user_id, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id
            "#,
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(req.published.unwrap_or(false))
        .bind(req.user_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create post: {}", e);
            ApiError::from_db(e)
        })?;

        let post = Self::get_by_id(pool, inserted.0).await?;
        log::info!("Created post with id: {}", inserted.0);
        Ok(post)
    }

    /// Retrieve post by ID with owner summary
    /// DOCUMENTATION: Used for GET /api/posts/{id} endpoint
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<PostResponse, ApiError> {
        let sql = format!("{} WHERE p.id = $1", POST_SELECT);
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching post {}: {}", id, e);
                ApiError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Post not found: {}", id);
                ApiError::NotFound("Post".to_string())
            })?;

        Ok(row.to_response())
    }

    /// Check whether a post row exists
    pub async fn exists(pool: &PgPool, id: i32) -> Result<bool, ApiError> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Database error checking post {}: {}", id, e);
                ApiError::DatabaseError(e.to_string())
            })?;
        Ok(row.0)
    }

    /// List posts with optional published filter
    /// DOCUMENTATION: Ordered newest first with id as stable tie-break;
    /// the filter applies to both the page and the total count
    /// Returns tuple: (results, total_count) for pagination
    pub async fn list(
        pool: &PgPool,
        params: PageParams,
        published: Option<bool>,
    ) -> Result<(Vec<PostResponse>, i64), ApiError> {
        let sql = format!(
            r#"{}
            WHERE ($3::boolean IS NULL OR p.published = $3)
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $1 OFFSET $2
            "#,
            POST_SELECT
        );

        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(params.limit)
            .bind(params.offset())
            .bind(published)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list posts: {}", e);
                ApiError::DatabaseError(e.to_string())
            })?;

        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM posts p WHERE ($1::boolean IS NULL OR p.published = $1)",
        )
        .bind(published)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Post count query error: {}", e);
            ApiError::DatabaseError(e.to_string())
        })?;

        Ok((rows.into_iter().map(|r| r.to_response()).collect(), total.0))
    }

    /// Most recent posts for a user (user detail embeds up to 5)
    pub async fn find_recent_by_user(
        pool: &PgPool,
        user_id: i32,
        take: i64,
    ) -> Result<Vec<Post>, ApiError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, published, user_id, created_at
            FROM posts
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(take)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch posts for user {}: {}", user_id, e);
            ApiError::DatabaseError(e.to_string())
        })
    }

    /// Update existing post
    pub async fn update_post(
        pool: &PgPool,
        id: i32,
        req: &UpdatePostRequest,
    ) -> Result<PostResponse, ApiError> {
        let updated: Option<(i32,)> = sqlx::query_as(
            r#"
            UPDATE posts
            SET title = $1, content = $2, published = $3
            WHERE id = $4
            RETURNING id
            "#,
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(req.published.unwrap_or(false))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Update failed for post {}: {}", id, e);
            ApiError::from_db(e)
        })?;

        match updated {
            Some((id,)) => {
                log::info!("Updated post: {}", id);
                Self::get_by_id(pool, id).await
            }
            None => Err(ApiError::NotFound("Post".to_string())),
        }
    }

    /// Delete post, cascading to its photos
    /// DOCUMENTATION: Returns the blob paths of the cascaded photos so the
    /// caller can clean up the files on disk as well
    pub async fn delete_post(pool: &PgPool, id: i32) -> Result<Vec<String>, ApiError> {
        let paths: Vec<(String,)> =
            sqlx::query_as("SELECT path FROM photos WHERE post_id = $1")
                .bind(id)
                .fetch_all(pool)
                .await
                .map_err(|e| {
                    log::error!("Failed to collect photo paths for post {}: {}", id, e);
                    ApiError::DatabaseError(e.to_string())
                })?;

        let rows = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Delete failed for post {}: {}", id, e);
                ApiError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            return Err(ApiError::NotFound("Post".to_string()));
        }

        log::info!("Deleted post: {}", id);
        Ok(paths.into_iter().map(|(p,)| p).collect())
    }
}
