// src/models/response.rs
// DOCUMENTATION: Uniform JSON envelope for all API responses
// PURPOSE: Success responses share one shape: { success, message?, data? }

use serde::Serialize;

/// The envelope wrapping every successful response body
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Plain data response, no message
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Data response with a human-readable message
    pub fn with_message(data: T, message: &str) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Message-only response (deletes and similar)
    pub fn message_only(message: &str) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.to_string()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_skips_absent_fields() {
        let body = serde_json::to_value(ApiResponse::ok(42)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], 42);
        assert!(body.get("message").is_none());

        let body = serde_json::to_value(ApiResponse::message_only("Deleted")).unwrap();
        assert_eq!(body["message"], "Deleted");
        assert!(body.get("data").is_none());
    }
}
