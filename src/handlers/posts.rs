// src/handlers/posts.rs
// DOCUMENTATION: HTTP handlers for the posts resource
// PURPOSE: Parse requests, call repositories/services, return envelopes

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

use crate::config::Config;
use crate::db::{PhotoRepository, PostRepository, UserRepository};
use crate::errors::ApiError;
use crate::handlers::multipart::read_image_field;
use crate::models::{
    ApiResponse, CreatePostRequest, ListPostsQuery, Page, PostDetail, UpdatePostRequest,
};
use crate::services::{
    BlobStore, DiskStorage, PgPhotoGateway, UploadService, UploadTarget,
};

/// POST /api/posts
/// Create a new post for an existing user
pub async fn create_post(
    pool: web::Data<PgPool>,
    req: web::Json<CreatePostRequest>,
) -> Result<impl Responder, ApiError> {
    req.validate()?;

    if !UserRepository::exists(pool.get_ref(), req.user_id).await? {
        return Err(ApiError::NotFound("User".to_string()));
    }

    let post = PostRepository::create_post(pool.get_ref(), &req).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(post, "Post created successfully")))
}

/// GET /api/posts
/// List posts with pagination and optional published filter
pub async fn list_posts(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<ListPostsQuery>,
) -> Result<impl Responder, ApiError> {
    let params = query.page.resolve(config.page_defaults.list_limit);
    let (posts, total) =
        PostRepository::list(pool.get_ref(), params, query.published_filter()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(Page::new(posts, params, total))))
}

/// GET /api/posts/{id}
/// Retrieve one post with its owner and photos
pub async fn get_post(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let id = path.into_inner();

    let post = PostRepository::get_by_id(pool.get_ref(), id).await?;
    let photos = PhotoRepository::find_by_post(pool.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDetail {
        post: post.post,
        user: post.user,
        photo_count: post.photo_count,
        photos,
    })))
}

/// PUT /api/posts/{id}
/// Update a post
pub async fn update_post(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    req: web::Json<UpdatePostRequest>,
) -> Result<impl Responder, ApiError> {
    req.validate()?;

    let post = PostRepository::update_post(pool.get_ref(), path.into_inner(), &req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(post, "Post updated successfully")))
}

/// DELETE /api/posts/{id}
/// Delete a post; its photos cascade and their blobs are removed too
pub async fn delete_post(
    pool: web::Data<PgPool>,
    storage: web::Data<DiskStorage>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let paths = PostRepository::delete_post(pool.get_ref(), path.into_inner()).await?;

    for blob_path in paths {
        if let Err(e) = storage.delete(&blob_path).await {
            log::warn!("Failed to delete cascaded blob {}: {}", blob_path, e);
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message_only("Post deleted successfully")))
}

/// POST /api/posts/{id}/upload
/// Attach an uploaded image to a post
pub async fn upload_post_photo(
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
        UploadTarget::AttachToPost(path.into_inner()),
        image,
        &base_url,
    )
    .await?;

    Ok(HttpResponse::Created()
        .json(ApiResponse::with_message(photo, "Photo uploaded successfully")))
}

/// GET /api/posts/{id}/photos
/// All photos attached to a post
pub async fn get_post_photos(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let photos = PhotoRepository::find_by_post(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(photos)))
}

/// Configuration for post routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/posts")
            .route("", web::get().to(list_posts))
            .route("", web::post().to(create_post))
            .route("/{id}", web::get().to(get_post))
            .route("/{id}", web::put().to(update_post))
            .route("/{id}", web::delete().to(delete_post))
            .route("/{id}/upload", web::post().to(upload_post_photo))
            .route("/{id}/photos", web::get().to(get_post_photos)),
    );
}
