// src/models/photo.rs
// DOCUMENTATION: Photo data structures
// PURPOSE: Database model and response DTOs for uploaded images

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{PostSummary, UserSummary};

/// A photo record from the database
/// DOCUMENTATION: `path` is the blob location relative to the process working
/// directory (e.g. "uploads/abc.jpg"), `url` the public address it was served
/// under at upload time
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: i32,
    pub filename: String,
    pub path: String,
    pub url: String,
    pub size: i32,
    pub mime_type: String,
    pub user_id: Option<i32>,
    pub post_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Photo response with owner summaries embedded where set
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    #[serde(flatten)]
    pub photo: Photo,
    pub user: Option<UserSummary>,
    pub post: Option<PostSummary>,
}

/// Fields persisted for a freshly stored blob
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub filename: String,
    pub path: String,
    pub url: String,
    pub size: i32,
    pub mime_type: String,
    pub user_id: Option<i32>,
    pub post_id: Option<i32>,
}
