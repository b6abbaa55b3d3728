// src/handlers/photos.rs
// DOCUMENTATION: HTTP handlers for the photos resource
// PURPOSE: Listing, detail, binary replace, delete and file serving

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;

use crate::config::Config;
use crate::db::PhotoRepository;
use crate::errors::ApiError;
use crate::handlers::multipart::read_image_field;
use crate::models::{ApiResponse, Page, PageQuery};
use crate::services::{
    BlobStore, DiskStorage, PgPhotoGateway, UploadService, UploadTarget,
};

/// GET /api/photos
/// List photos with pagination
pub async fn list_photos(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
) -> Result<impl Responder, ApiError> {
    let params = query.resolve(config.page_defaults.photo_limit);
    let (photos, total) = PhotoRepository::list(pool.get_ref(), params).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(Page::new(photos, params, total))))
}

/// GET /api/photos/{id}
/// Retrieve one photo with its owner summaries
pub async fn get_photo(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let photo = PhotoRepository::get_by_id(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(photo)))
}

/// PUT /api/photos/{id}
/// Replace the stored image of an existing photo
pub async fn update_photo(
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
        UploadTarget::ReplacePhoto(path.into_inner()),
        image,
        &base_url,
    )
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(photo, "Photo updated successfully")))
}

/// DELETE /api/photos/{id}
/// Delete a photo row, then its blob (best-effort)
pub async fn delete_photo(
    pool: web::Data<PgPool>,
    storage: web::Data<DiskStorage>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let photo = PhotoRepository::delete_photo(pool.get_ref(), path.into_inner()).await?;

    if let Err(e) = storage.delete(&photo.path).await {
        log::warn!("Failed to delete blob {}: {}", photo.path, e);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message_only("Photo deleted successfully")))
}

/// GET /api/photos/file/{filename}
/// Stream a stored image by filename
pub async fn serve_photo_file(
    pool: web::Data<PgPool>,
    storage: web::Data<DiskStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let filename = path.into_inner();

    // Filenames are generated flat; anything path-like is hostile
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(ApiError::BadRequest("Invalid filename".to_string()));
    }

    let photo = PhotoRepository::find_by_filename(pool.get_ref(), &filename)
        .await?
        .ok_or_else(|| ApiError::NotFound("File".to_string()))?;

    let bytes = storage
        .read(&filename)
        .await?
        .ok_or_else(|| ApiError::NotFound("File".to_string()))?;

    Ok(HttpResponse::Ok().content_type(photo.mime_type).body(bytes))
}

/// Configuration for photo routes
/// DOCUMENTATION: /file/{filename} registers before /{id} so it wins the match
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/photos")
            .route("", web::get().to(list_photos))
            .route("/file/{filename}", web::get().to(serve_photo_file))
            .route("/{id}", web::get().to(get_photo))
            .route("/{id}", web::put().to(update_photo))
            .route("/{id}", web::delete().to(delete_photo)),
    );
}
