// src/handlers/users.rs
// DOCUMENTATION: HTTP handlers for the users resource
// PURPOSE: Parse requests, call repositories/services, return envelopes

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

use crate::config::Config;
use crate::db::{PhotoRepository, PostRepository, UserRepository};
use crate::errors::ApiError;
use crate::handlers::multipart::read_image_field;
use crate::models::{ApiResponse, Page, PageQuery, UserDetail, UserRequest};
use crate::services::{
    BlobStore, DiskStorage, PgPhotoGateway, UploadService, UploadTarget,
};

/// How many recent posts/photos the user detail embeds
const DETAIL_TAKE: i64 = 5;

/// POST /api/users
/// Create a new user
pub async fn create_user(
    pool: web::Data<PgPool>,
    req: web::Json<UserRequest>,
) -> Result<impl Responder, ApiError> {
    req.validate()?;

    let user = UserRepository::create_user(pool.get_ref(), &req).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(user, "User created successfully")))
}

/// GET /api/users
/// List users with pagination
pub async fn list_users(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
) -> Result<impl Responder, ApiError> {
    let params = query.resolve(config.page_defaults.list_limit);
    let (users, total) = UserRepository::list(pool.get_ref(), params).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(Page::new(users, params, total))))
}

/// GET /api/users/{id}
/// Retrieve one user with their newest posts and photos
pub async fn get_user(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();

    let user = UserRepository::get_by_id(pool.get_ref(), id).await?;
    let posts = PostRepository::find_recent_by_user(pool.get_ref(), id, DETAIL_TAKE).await?;
    let photos = PhotoRepository::find_by_user(pool.get_ref(), id, Some(DETAIL_TAKE)).await?;
    let (post_count, photo_count) = UserRepository::counts(pool.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserDetail {
        user,
        posts,
        photos,
        post_count,
        photo_count,
    })))
}

/// PUT /api/users/{id}
/// Update a user
pub async fn update_user(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    req: web::Json<UserRequest>,
) -> Result<impl Responder, ApiError> {
    req.validate()?;

    let user = UserRepository::update_user(pool.get_ref(), path.into_inner(), &req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(user, "User updated successfully")))
}

/// DELETE /api/users/{id}
/// Delete a user; rows cascade and the orphaned blobs are removed too
pub async fn delete_user(
    pool: web::Data<PgPool>,
    storage: web::Data<DiskStorage>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let paths = UserRepository::delete_user(pool.get_ref(), path.into_inner()).await?;

    // Best-effort blob cleanup for the cascaded photos
    for blob_path in paths {
        if let Err(e) = storage.delete(&blob_path).await {
            log::warn!("Failed to delete cascaded blob {}: {}", blob_path, e);
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message_only("User deleted successfully")))
}

/// POST /api/users/{id}/upload
/// Attach an uploaded image to a user
pub async fn upload_user_photo(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    storage: web::Data<DiskStorage>,
    path: web::Path<i32>,
    payload: Multipart,
) -> Result<impl Responder, ApiError> {
    let image = read_image_field(payload, config.max_upload_bytes).await?;

    let conn = req.connection_info().clone();
    let base_url = format!("{}://{}", conn.scheme(), conn.host());

    let photo = UploadService::store_photo(
        &PgPhotoGateway::new(pool.get_ref()),
        storage.get_ref(),
        UploadTarget::AttachToUser(path.into_inner()),
        image,
        &base_url,
    )
    .await?;

    Ok(HttpResponse::Created()
        .json(ApiResponse::with_message(photo, "Photo uploaded successfully")))
}

/// GET /api/users/{id}/photos
/// All photos attached to a user
pub async fn get_user_photos(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let photos = PhotoRepository::find_by_user(pool.get_ref(), path.into_inner(), None).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(photos)))
}

/// Configuration for user routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::delete().to(delete_user))
            .route("/{id}/upload", web::post().to(upload_user_photo))
            .route("/{id}/photos", web::get().to(get_user_photos)),
    );
}
