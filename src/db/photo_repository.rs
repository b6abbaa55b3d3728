// src/db/photo_repository.rs
// DOCUMENTATION: Photo database operations
// PURPOSE: Handle CRUD operations for uploaded photos

use crate::errors::ApiError;
use crate::models::{NewPhoto, PageParams, Photo, PhotoResponse, PostSummary, UserSummary};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

/// Internal struct for mapping photo rows joined with their owners
#[derive(Debug, FromRow)]
struct PhotoRow {
    pub id: i32,
    pub filename: String,
    pub path: String,
    pub url: String,
    pub size: i32,
    pub mime_type: String,
    pub user_id: Option<i32>,
    pub post_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub post_title: Option<String>,
}

impl PhotoRow {
    fn to_response(self) -> PhotoResponse {
        let user = match (self.user_id, self.user_name, self.user_email) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary { id, name, email }),
            _ => None,
        };
        let post = match (self.post_id, self.post_title) {
            (Some(id), Some(title)) => Some(PostSummary { id, title }),
            _ => None,
        };

        PhotoResponse {
            photo: Photo {
                id: self.id,
                filename: self.filename,
                path: self.path,
                url: self.url,
                size: self.size,
                mime_type: self.mime_type,
                user_id: self.user_id,
                post_id: self.post_id,
                created_at: self.created_at,
            },
            user,
            post,
        }
    }
}

const PHOTO_SELECT: &str = r#"
    SELECT
        ph.id, ph.filename, ph.path, ph.url, ph.size, ph.mime_type,
        ph.user_id, ph.post_id, ph.created_at,
        u.name AS user_name, u.email AS user_email,
        p.title AS post_title
    FROM photos ph
    LEFT JOIN users u ON u.id = ph.user_id
    LEFT JOIN posts p ON p.id = ph.post_id
"#;

pub struct PhotoRepository;

impl PhotoRepository {
    /// Insert a photo row for a freshly stored blob
    pub async fn create_photo(pool: &PgPool, new: &NewPhoto) -> Result<Photo, ApiError> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (filename, path, url, size, mime_type, user_id, post_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING *
            "#,
        )
        .bind(&new.filename)
        .bind(&new.path)
        .bind(&new.url)
        .bind(new.size)
        .bind(&new.mime_type)
        .bind(new.user_id)
        .bind(new.post_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create photo: {}", e);
            ApiError::from_db(e)
        })?;

        log::info!("Created photo with id: {}", photo.id);
        Ok(photo)
    }

    /// Retrieve photo by ID with owner summaries
    /// DOCUMENTATION: Used for GET /api/photos/{id} endpoint
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<PhotoResponse, ApiError> {
        let sql = format!("{} WHERE ph.id = $1", PHOTO_SELECT);
        let row = sqlx::query_as::<_, PhotoRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching photo {}: {}", id, e);
                ApiError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Photo not found: {}", id);
                ApiError::NotFound("Photo".to_string())
            })?;

        Ok(row.to_response())
    }

    /// Plain photo row lookup without joins (upload replace path)
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Photo>, ApiError> {
        sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching photo {}: {}", id, e);
                ApiError::DatabaseError(e.to_string())
            })
    }

    /// Look up a photo by its stored filename (file serving)
    pub async fn find_by_filename(
        pool: &PgPool,
        filename: &str,
    ) -> Result<Option<Photo>, ApiError> {
        sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE filename = $1")
            .bind(filename)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching photo {}: {}", filename, e);
                ApiError::DatabaseError(e.to_string())
            })
    }

    /// List photos with owner summaries
    /// DOCUMENTATION: Ordered newest first with id as stable tie-break
    /// Returns tuple: (results, total_count) for pagination
    pub async fn list(
        pool: &PgPool,
        params: PageParams,
    ) -> Result<(Vec<PhotoResponse>, i64), ApiError> {
        let sql = format!(
            r#"{}
            ORDER BY ph.created_at DESC, ph.id DESC
            LIMIT $1 OFFSET $2
            "#,
            PHOTO_SELECT
        );

        let rows = sqlx::query_as::<_, PhotoRow>(&sql)
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list photos: {}", e);
                ApiError::DatabaseError(e.to_string())
            })?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM photos")
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Photo count query error: {}", e);
                ApiError::DatabaseError(e.to_string())
            })?;

        Ok((rows.into_iter().map(|r| r.to_response()).collect(), total.0))
    }

    /// All photos attached to a user, newest first
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: i32,
        take: Option<i64>,
    ) -> Result<Vec<Photo>, ApiError> {
        sqlx::query_as::<_, Photo>(
            r#"
            SELECT * FROM photos
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
            log::error!("Failed to fetch photos for user {}: {}", user_id, e);
            ApiError::DatabaseError(e.to_string())
        })
    }

    /// All photos attached to a post, newest first
    pub async fn find_by_post(pool: &PgPool, post_id: i32) -> Result<Vec<Photo>, ApiError> {
        sqlx::query_as::<_, Photo>(
            r#"
            SELECT * FROM photos
            WHERE post_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch photos for post {}: {}", post_id, e);
            ApiError::DatabaseError(e.to_string())
        })
    }

    /// Point an existing photo row at a replacement blob
    pub async fn update_photo_file(
        pool: &PgPool,
        id: i32,
        new: &NewPhoto,
    ) -> Result<Photo, ApiError> {
        sqlx::query_as::<_, Photo>(
            r#"
            UPDATE photos
            SET filename = $1, path = $2, url = $3, size = $4, mime_type = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&new.filename)
        .bind(&new.path)
        .bind(&new.url)
        .bind(new.size)
        .bind(&new.mime_type)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Update failed for photo {}: {}", id, e);
            ApiError::from_db(e)
        })?
        .ok_or_else(|| ApiError::NotFound("Photo".to_string()))
    }

    /// Delete photo row, returning it so the caller can remove the blob
    pub async fn delete_photo(pool: &PgPool, id: i32) -> Result<Photo, ApiError> {
        let photo = sqlx::query_as::<_, Photo>("DELETE FROM photos WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Delete failed for photo {}: {}", id, e);
                ApiError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| ApiError::NotFound("Photo".to_string()))?;

        log::info!("Deleted photo: {}", id);
        Ok(photo)
    }
}
