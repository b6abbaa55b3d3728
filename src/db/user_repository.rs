// src/db/user_repository.rs
// DOCUMENTATION: User database operations
// PURPOSE: Abstract database operations from business logic

use crate::errors::ApiError;
use crate::models::{PageParams, User, UserRequest, UserWithCounts};
use sqlx::PgPool;

pub struct UserRepository;

impl UserRepository {
    /// Create new user in database
    /// DOCUMENTATION: Inserts user and returns created record
    /// Used by POST /api/users endpoint
    pub async fn create_user(pool: &PgPool, req: &UserRequest) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, age, bio, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.email)
        .bind(req.age)
        .bind(&req.bio)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create user: {}", e);
            ApiError::from_db(e)
        })?;

        log::info!("Created user with id: {}", user.id);
        Ok(user)
    }

    /// Retrieve user by ID
    /// DOCUMENTATION: Used for GET /api/users/{id} endpoint
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching user {}: {}", id, e);
                ApiError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("User not found: {}", id);
                ApiError::NotFound("User".to_string())
            })
    }

    /// Check whether a user row exists
    pub async fn exists(pool: &PgPool, id: i32) -> Result<bool, ApiError> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Database error checking user {}: {}", id, e);
                ApiError::DatabaseError(e.to_string())
            })?;
        Ok(row.0)
    }

    /// Total post and photo counts for one user (detail response)
    pub async fn counts(pool: &PgPool, id: i32) -> Result<(i64, i64), ApiError> {
        sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM posts WHERE user_id = $1),
                (SELECT COUNT(*) FROM photos WHERE user_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Count query error for user {}: {}", id, e);
            ApiError::DatabaseError(e.to_string())
        })
    }

    /// List users with post/photo counts
    /// DOCUMENTATION: Ordered newest first with id as stable tie-break so
    /// pagination stays deterministic across calls
    /// Returns tuple: (results, total_count) for pagination
    pub async fn list(
        pool: &PgPool,
        params: PageParams,
    ) -> Result<(Vec<UserWithCounts>, i64), ApiError> {
        let users = sqlx::query_as::<_, UserWithCounts>(
            r#"
            SELECT
                u.id, u.name, u.email, u.age, u.bio, u.created_at,
                (SELECT COUNT(*) FROM posts p WHERE p.user_id = u.id) AS post_count,
                (SELECT COUNT(*) FROM photos ph WHERE ph.user_id = u.id) AS photo_count
            FROM users u
            ORDER BY u.created_at DESC, u.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.limit)
        .bind(params.offset())
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list users: {}", e);
            ApiError::DatabaseError(e.to_string())
        })?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("User count query error: {}", e);
                ApiError::DatabaseError(e.to_string())
            })?;

        Ok((users, total.0))
    }

    /// Update existing user
    /// DOCUMENTATION: Full replace of the editable fields, like the create shape
    pub async fn update_user(
        pool: &PgPool,
        id: i32,
        req: &UserRequest,
    ) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $1, email = $2, age = $3, bio = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.email)
        .bind(req.age)
        .bind(&req.bio)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Update failed for user {}: {}", id, e);
            ApiError::from_db(e)
        })?
        .ok_or_else(|| ApiError::NotFound("User".to_string()))?;

        log::info!("Updated user: {}", id);
        Ok(user)
    }

    /// Delete user, cascading to their posts and photos
    /// DOCUMENTATION: Returns the blob paths of every photo removed by the
    /// cascade (owned directly or through a post) so the caller can clean up
    /// the files on disk as well
    pub async fn delete_user(pool: &PgPool, id: i32) -> Result<Vec<String>, ApiError> {
        let paths: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT path FROM photos
            WHERE user_id = $1
               OR post_id IN (SELECT id FROM posts WHERE user_id = $1)
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to collect photo paths for user {}: {}", id, e);
            ApiError::DatabaseError(e.to_string())
        })?;

        let rows = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Delete failed for user {}: {}", id, e);
                ApiError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            return Err(ApiError::NotFound("User".to_string()));
        }

        log::info!("Deleted user: {}", id);
        Ok(paths.into_iter().map(|(p,)| p).collect())
    }
}
