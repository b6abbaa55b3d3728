// src/handlers/multipart.rs
// DOCUMENTATION: Multipart form-data extraction for image uploads
// PURPOSE: Read the "image" field off the wire, enforcing the size limit
// while streaming so oversized payloads are rejected early

use actix_multipart::Multipart;
use futures_util::StreamExt;

use crate::errors::ApiError;
use crate::services::UploadedImage;

/// Read the `image` field of a multipart request into memory
///
/// Returns `PayloadTooLarge` as soon as the running total exceeds
/// `max_bytes`, and `BadRequest` when the field is missing or empty.
pub async fn read_image_field(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<UploadedImage, ApiError> {
    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?;

        if field.name() != "image" {
            continue;
        }

        let mime_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let bytes =
                chunk.map_err(|e| ApiError::BadRequest(format!("Upload read error: {}", e)))?;
            if data.len() + bytes.len() > max_bytes {
                return Err(ApiError::PayloadTooLarge(max_bytes));
            }
            data.extend_from_slice(&bytes);
        }

        if data.is_empty() {
            return Err(ApiError::BadRequest("Image file is required".to_string()));
        }

        return Ok(UploadedImage { data, mime_type });
    }

    Err(ApiError::BadRequest("Image file is required".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::error::PayloadError;
    use actix_web::http::header::{HeaderMap, CONTENT_TYPE};
    use actix_web::web::Bytes;
    use futures_util::stream;

    const BOUNDARY: &str = "abbc761f78ff4d7cb7573b5a23f96ef0";

    /// Wrap a raw multipart body the way actix hands it to an extractor
    fn multipart(body: Vec<u8>) -> Multipart {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary=\"{}\"", BOUNDARY)
                .parse()
                .unwrap(),
        );
        let chunks: Vec<Result<Bytes, PayloadError>> = vec![Ok(Bytes::from(body))];
        Multipart::new(&headers, stream::iter(chunks))
    }

    /// Build a single-field form-data body carrying `data` under `field`
    fn form_body(field: &str, data: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"photo.jpg\"\r\n",
                field
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    #[tokio::test]
    async fn test_reads_image_field() {
        let payload = multipart(form_body("image", &[0xFF, 0xD8, 0xFF]));
        let image = read_image_field(payload, 1024).await.unwrap();
        assert_eq!(image.data, vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_over_limit_payload_rejected() {
        let payload = multipart(form_body("image", &[0u8; 64]));
        let result = read_image_field(payload, 16).await;
        assert!(matches!(result, Err(ApiError::PayloadTooLarge(16))));
    }

    #[tokio::test]
    async fn test_missing_image_field_rejected() {
        // A form with only an unrelated field carries no image
        let payload = multipart(form_body("avatar", b"some bytes"));
        let result = read_image_field(payload, 1024).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_empty_image_field_rejected() {
        let payload = multipart(form_body("image", b""));
        let result = read_image_field(payload, 1024).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
