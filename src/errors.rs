// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use validator::ValidationErrors;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and JSON envelope
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Data already exists (unique constraint): {0}")]
    Conflict(String),

    #[error("Validation failed")]
    ValidationFailed(HashMap<String, Vec<String>>),

    #[error("{0}")]
    BadRequest(String),

    #[error("File too large. Maximum size is {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApiError {
    /// Map a sqlx error to the API error it represents
    /// DOCUMENTATION: Unique violations become Conflict (409), foreign key
    /// violations become NotFound (404), everything else is a DatabaseError
    pub fn from_db(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => {
                    return ApiError::Conflict(
                        db_err.constraint().unwrap_or("unique constraint").to_string(),
                    );
                }
                Some("23503") => {
                    return ApiError::NotFound("Referenced record".to_string());
                }
                _ => {}
            }
        }
        ApiError::DatabaseError(err.to_string())
    }
}

/// Convert validator output into the per-field error map of the envelope
impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: HashMap<String, Vec<String>> = HashMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        ApiError::ValidationFailed(fields)
    }
}

/// Convert ApiError to HTTP response
/// DOCUMENTATION: Every error renders as the uniform JSON envelope
/// { success: false, message, errors?: { field: [messages] } }
impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::ValidationFailed(fields) => json!({
                "success": false,
                "message": self.to_string(),
                "errors": fields
            }),
            _ => json!({
                "success": false,
                "message": self.to_string()
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::BAD_REQUEST,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::NotFound("User".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("users_email_key".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::ValidationFailed(HashMap::new()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::PayloadTooLarge(5 * 1024 * 1024).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::DatabaseError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_error_response() {
        let mut fields = HashMap::new();
        fields.insert("email".to_string(), vec!["Email is invalid".to_string()]);
        let err = ApiError::ValidationFailed(fields);

        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
