// src/handlers/index.rs
// DOCUMENTATION: API index and fallback handlers
// PURPOSE: Welcome route listing the resource roots, plus the 404 envelope

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /api
/// API documentation entry point
pub async fn api_index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to the Blog API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "users": "/api/users",
            "posts": "/api/posts",
            "photos": "/api/photos"
        }
    }))
}

/// Fallback for unknown routes
pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "message": "Route not found"
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api", web::get().to(api_index));
}
