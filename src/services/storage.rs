// src/services/storage.rs
// DOCUMENTATION: Blob storage for uploaded images
// PURPOSE: Save, check, read and delete binary files independent of any
// database row

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::errors::ApiError;

/// Metadata of a stored blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub filename: String,
    pub path: String,
    pub size: i32,
    pub mime_type: String,
}

/// Blob store contract consumed by the upload flow
/// DOCUMENTATION: `delete` is idempotent; deleting an absent path is not an
/// error. Implemented by DiskStorage in production and by an in-memory store
/// in tests.
pub trait BlobStore: Send + Sync {
    /// Persist a binary payload, returning stored filename/path/size/mime
    fn save(
        &self,
        payload: &[u8],
        mime_type: &str,
    ) -> impl std::future::Future<Output = Result<StoredBlob, ApiError>> + Send;

    /// Check whether a blob exists at the given path
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool, ApiError>> + Send;

    /// Remove a blob; absent paths succeed silently
    fn delete(&self, path: &str) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;
}

/// Local filesystem blob store
/// DOCUMENTATION: Stores uploads under a flat directory with generated
/// UUID filenames; the stored `path` is `{dir}/{filename}` relative to the
/// process working directory and doubles as the URL path segment
#[derive(Debug, Clone)]
pub struct DiskStorage {
    dir: String,
}

impl DiskStorage {
    /// Create the store, ensuring the upload directory exists
    pub fn new(dir: &str) -> Result<Self, ApiError> {
        std::fs::create_dir_all(dir).map_err(|e| {
            log::error!("Failed to create upload dir {}: {}", dir, e);
            ApiError::StorageError(format!("Cannot create upload directory: {}", e))
        })?;

        Ok(DiskStorage {
            dir: dir.trim_end_matches('/').to_string(),
        })
    }

    /// Pick a file extension for the declared MIME type
    fn extension_for(mime_type: &str) -> &'static str {
        match mime_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            _ => "bin",
        }
    }

    fn file_path(&self, filename: &str) -> PathBuf {
        Path::new(&self.dir).join(filename)
    }

    /// Read a stored blob by filename, None when absent
    /// DOCUMENTATION: Used by the file-serving endpoint; the caller is
    /// responsible for rejecting path traversal in the filename
    pub async fn read(&self, filename: &str) -> Result<Option<Vec<u8>>, ApiError> {
        match tokio::fs::read(self.file_path(filename)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                log::error!("Failed to read blob {}: {}", filename, e);
                Err(ApiError::StorageError(e.to_string()))
            }
        }
    }
}

impl BlobStore for DiskStorage {
    async fn save(&self, payload: &[u8], mime_type: &str) -> Result<StoredBlob, ApiError> {
        let filename = format!("{}.{}", Uuid::new_v4(), Self::extension_for(mime_type));
        let path = format!("{}/{}", self.dir, filename);

        tokio::fs::write(&path, payload).await.map_err(|e| {
            log::error!("Failed to write blob {}: {}", path, e);
            ApiError::StorageError(e.to_string())
        })?;

        log::debug!("Stored blob {} ({} bytes)", path, payload.len());

        Ok(StoredBlob {
            filename,
            path,
            size: payload.len() as i32,
            mime_type: mime_type.to_string(),
        })
    }

    async fn exists(&self, path: &str) -> Result<bool, ApiError> {
        match tokio::fs::metadata(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ApiError::StorageError(e.to_string())),
        }
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            // Already gone counts as success
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                log::error!("Failed to delete blob {}: {}", path, e);
                Err(ApiError::StorageError(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (DiskStorage, String) {
        let dir = std::env::temp_dir()
            .join(format!("blog-api-test-{}", Uuid::new_v4()))
            .to_string_lossy()
            .to_string();
        (DiskStorage::new(&dir).unwrap(), dir)
    }

    #[tokio::test]
    async fn test_save_then_read_back() {
        let (store, dir) = temp_store();

        let blob = store.save(b"hello", "image/png").await.unwrap();
        assert!(blob.filename.ends_with(".png"));
        assert_eq!(blob.size, 5);
        assert_eq!(blob.mime_type, "image/png");
        assert!(store.exists(&blob.path).await.unwrap());

        let bytes = store.read(&blob.filename).await.unwrap();
        assert_eq!(bytes, Some(b"hello".to_vec()));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (store, dir) = temp_store();

        let blob = store.save(b"data", "image/jpeg").await.unwrap();
        store.delete(&blob.path).await.unwrap();
        assert!(!store.exists(&blob.path).await.unwrap());

        // Second delete of the same path must not error
        store.delete(&blob.path).await.unwrap();

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_none() {
        let (store, dir) = temp_store();
        assert_eq!(store.read("nope.jpg").await.unwrap(), None);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(DiskStorage::extension_for("image/jpeg"), "jpg");
        assert_eq!(DiskStorage::extension_for("image/webp"), "webp");
        assert_eq!(DiskStorage::extension_for("application/pdf"), "bin");
    }
}
