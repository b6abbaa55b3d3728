// src/services/upload_service.rs
// DOCUMENTATION: Upload-with-compensation orchestration
// PURPOSE: Store a blob, then persist the database row referencing it,
// rolling the blob back on any downstream failure so no orphan survives

use sqlx::PgPool;

use crate::db::{PhotoRepository, PostRepository, UserRepository};
use crate::errors::ApiError;
use crate::models::{NewPhoto, Photo};
use crate::services::storage::{BlobStore, StoredBlob};

/// What an uploaded image should attach to, or which photo it replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    AttachToUser(i32),
    AttachToPost(i32),
    ReplacePhoto(i32),
}

/// An inbound image payload, already read off the wire and size-checked
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Persistence operations the upload flow needs from the database
/// DOCUMENTATION: Seam for testing the compensation logic against an
/// in-memory gateway; PgPhotoGateway is the production implementation
pub trait PhotoGateway: Send + Sync {
    fn user_exists(
        &self,
        id: i32,
    ) -> impl std::future::Future<Output = Result<bool, ApiError>> + Send;

    fn post_exists(
        &self,
        id: i32,
    ) -> impl std::future::Future<Output = Result<bool, ApiError>> + Send;

    fn find_photo(
        &self,
        id: i32,
    ) -> impl std::future::Future<Output = Result<Option<Photo>, ApiError>> + Send;

    fn create_photo(
        &self,
        new: NewPhoto,
    ) -> impl std::future::Future<Output = Result<Photo, ApiError>> + Send;

    fn replace_photo_file(
        &self,
        id: i32,
        new: NewPhoto,
    ) -> impl std::future::Future<Output = Result<Photo, ApiError>> + Send;
}

/// Production gateway delegating to the sqlx repositories
pub struct PgPhotoGateway<'a> {
    pool: &'a PgPool,
}

impl<'a> PgPhotoGateway<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        PgPhotoGateway { pool }
    }
}

impl PhotoGateway for PgPhotoGateway<'_> {
    async fn user_exists(&self, id: i32) -> Result<bool, ApiError> {
        UserRepository::exists(self.pool, id).await
    }

    async fn post_exists(&self, id: i32) -> Result<bool, ApiError> {
        PostRepository::exists(self.pool, id).await
    }

    async fn find_photo(&self, id: i32) -> Result<Option<Photo>, ApiError> {
        PhotoRepository::find_by_id(self.pool, id).await
    }

    async fn create_photo(&self, new: NewPhoto) -> Result<Photo, ApiError> {
        PhotoRepository::create_photo(self.pool, &new).await
    }

    async fn replace_photo_file(&self, id: i32, new: NewPhoto) -> Result<Photo, ApiError> {
        PhotoRepository::update_photo_file(self.pool, id, &new).await
    }
}

/// Cleanup actions accumulated while an upload progresses
/// DOCUMENTATION: Paths are pushed after each successful side effect and
/// deleted in reverse order when a later step fails. A failed compensating
/// delete is logged and swallowed; the original failure is what the caller
/// sees.
#[derive(Debug, Default)]
struct Compensations {
    paths: Vec<String>,
}

impl Compensations {
    fn push(&mut self, path: String) {
        self.paths.push(path);
    }

    async fn run<B: BlobStore>(self, blobs: &B) {
        for path in self.paths.into_iter().rev() {
            if let Err(e) = blobs.delete(&path).await {
                log::warn!("Compensating delete failed for {}: {}", path, e);
            }
        }
    }
}

pub struct UploadService;

impl UploadService {
    /// Store an image and attach it per the target descriptor
    ///
    /// Step 1 writes the blob (the only compensable side effect), step 2
    /// resolves the target, step 3 writes the database row. Any failure in
    /// step 2 or 3 deletes the blob written in step 1 before propagating.
    /// `base_url` is the `{scheme}://{host}` prefix for the public URL.
    pub async fn store_photo<G: PhotoGateway, B: BlobStore>(
        gateway: &G,
        blobs: &B,
        target: UploadTarget,
        image: UploadedImage,
        base_url: &str,
    ) -> Result<Photo, ApiError> {
        let blob = blobs.save(&image.data, &image.mime_type).await?;

        let mut cleanup = Compensations::default();
        cleanup.push(blob.path.clone());

        match Self::resolve_target(gateway, blobs, target, &blob, base_url).await {
            Ok(photo) => Ok(photo),
            Err(e) => {
                cleanup.run(blobs).await;
                Err(e)
            }
        }
    }

    /// Single resolution point for all three target kinds
    async fn resolve_target<G: PhotoGateway, B: BlobStore>(
        gateway: &G,
        blobs: &B,
        target: UploadTarget,
        blob: &StoredBlob,
        base_url: &str,
    ) -> Result<Photo, ApiError> {
        let new = NewPhoto {
            filename: blob.filename.clone(),
            path: blob.path.clone(),
            url: format!("{}/{}", base_url, blob.path),
            size: blob.size,
            mime_type: blob.mime_type.clone(),
            user_id: None,
            post_id: None,
        };

        match target {
            UploadTarget::AttachToUser(user_id) => {
                if !gateway.user_exists(user_id).await? {
                    return Err(ApiError::NotFound("User".to_string()));
                }
                gateway
                    .create_photo(NewPhoto {
                        user_id: Some(user_id),
                        ..new
                    })
                    .await
            }
            UploadTarget::AttachToPost(post_id) => {
                if !gateway.post_exists(post_id).await? {
                    return Err(ApiError::NotFound("Post".to_string()));
                }
                gateway
                    .create_photo(NewPhoto {
                        post_id: Some(post_id),
                        ..new
                    })
                    .await
            }
            UploadTarget::ReplacePhoto(photo_id) => {
                let existing = gateway
                    .find_photo(photo_id)
                    .await?
                    .ok_or_else(|| ApiError::NotFound("Photo".to_string()))?;

                // Best-effort removal of the previous blob
                if existing.path != blob.path {
                    if let Err(e) = blobs.delete(&existing.path).await {
                        log::warn!(
                            "Failed to delete replaced blob {}: {}",
                            existing.path,
                            e
                        );
                    }
                }

                gateway.replace_photo_file(photo_id, new).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory blob store for exercising the compensation paths
    #[derive(Default)]
    struct MemoryBlobStore {
        blobs: Mutex<HashMap<String, Vec<u8>>>,
        next_id: AtomicUsize,
        fail_deletes: bool,
    }

    impl MemoryBlobStore {
        fn failing_deletes() -> Self {
            MemoryBlobStore {
                fail_deletes: true,
                ..Default::default()
            }
        }

        fn insert(&self, path: &str, data: &[u8]) {
            self.blobs.lock().unwrap().insert(path.to_string(), data.to_vec());
        }

        fn contains(&self, path: &str) -> bool {
            self.blobs.lock().unwrap().contains_key(path)
        }

        fn len(&self) -> usize {
            self.blobs.lock().unwrap().len()
        }
    }

    impl BlobStore for MemoryBlobStore {
        async fn save(&self, payload: &[u8], mime_type: &str) -> Result<StoredBlob, ApiError> {
            let n = self.next_id.fetch_add(1, Ordering::SeqCst);
            let filename = format!("blob-{}.jpg", n);
            let path = format!("mem/{}", filename);
            self.insert(&path, payload);
            Ok(StoredBlob {
                filename,
                path,
                size: payload.len() as i32,
                mime_type: mime_type.to_string(),
            })
        }

        async fn exists(&self, path: &str) -> Result<bool, ApiError> {
            Ok(self.contains(path))
        }

        async fn delete(&self, path: &str) -> Result<(), ApiError> {
            if self.fail_deletes {
                return Err(ApiError::StorageError("delete disabled".to_string()));
            }
            self.blobs.lock().unwrap().remove(path);
            Ok(())
        }
    }

    /// In-memory gateway standing in for the database
    #[derive(Default)]
    struct MockGateway {
        users: HashSet<i32>,
        posts: HashSet<i32>,
        photos: Mutex<HashMap<i32, Photo>>,
        next_id: AtomicI32,
        fail_writes: bool,
    }

    impl MockGateway {
        fn with_user(id: i32) -> Self {
            let mut gw = MockGateway::default();
            gw.users.insert(id);
            gw
        }

        fn with_post(id: i32) -> Self {
            let mut gw = MockGateway::default();
            gw.posts.insert(id);
            gw
        }

        fn with_photo(id: i32, path: &str) -> Self {
            let gw = MockGateway::default();
            gw.photos.lock().unwrap().insert(
                id,
                Photo {
                    id,
                    filename: path.rsplit('/').next().unwrap().to_string(),
                    path: path.to_string(),
                    url: format!("http://localhost:3000/{}", path),
                    size: 100,
                    mime_type: "image/jpeg".to_string(),
                    user_id: Some(1),
                    post_id: None,
                    created_at: Utc::now(),
                },
            );
            gw
        }

        fn photo_count(&self) -> usize {
            self.photos.lock().unwrap().len()
        }
    }

    impl PhotoGateway for MockGateway {
        async fn user_exists(&self, id: i32) -> Result<bool, ApiError> {
            Ok(self.users.contains(&id))
        }

        async fn post_exists(&self, id: i32) -> Result<bool, ApiError> {
            Ok(self.posts.contains(&id))
        }

        async fn find_photo(&self, id: i32) -> Result<Option<Photo>, ApiError> {
            Ok(self.photos.lock().unwrap().get(&id).cloned())
        }

        async fn create_photo(&self, new: NewPhoto) -> Result<Photo, ApiError> {
            if self.fail_writes {
                return Err(ApiError::Conflict("photos_key".to_string()));
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let photo = Photo {
                id,
                filename: new.filename,
                path: new.path,
                url: new.url,
                size: new.size,
                mime_type: new.mime_type,
                user_id: new.user_id,
                post_id: new.post_id,
                created_at: Utc::now(),
            };
            self.photos.lock().unwrap().insert(id, photo.clone());
            Ok(photo)
        }

        async fn replace_photo_file(&self, id: i32, new: NewPhoto) -> Result<Photo, ApiError> {
            if self.fail_writes {
                return Err(ApiError::DatabaseError("write disabled".to_string()));
            }
            let mut photos = self.photos.lock().unwrap();
            let photo = photos
                .get_mut(&id)
                .ok_or_else(|| ApiError::NotFound("Photo".to_string()))?;
            photo.filename = new.filename;
            photo.path = new.path;
            photo.url = new.url;
            photo.size = new.size;
            photo.mime_type = new.mime_type;
            Ok(photo.clone())
        }
    }

    fn image() -> UploadedImage {
        UploadedImage {
            data: vec![0xFF, 0xD8, 0xFF],
            mime_type: "image/jpeg".to_string(),
        }
    }

    const BASE: &str = "http://localhost:3000";

    #[tokio::test]
    async fn test_attach_to_user_success() {
        let gateway = MockGateway::with_user(1);
        let blobs = MemoryBlobStore::default();

        let photo = UploadService::store_photo(
            &gateway,
            &blobs,
            UploadTarget::AttachToUser(1),
            image(),
            BASE,
        )
        .await
        .unwrap();

        assert_eq!(photo.user_id, Some(1));
        assert_eq!(photo.post_id, None);
        assert_eq!(photo.url, format!("{}/{}", BASE, photo.path));
        // Exactly one blob survives and the row points at it
        assert_eq!(blobs.len(), 1);
        assert!(blobs.contains(&photo.path));
        assert_eq!(gateway.photo_count(), 1);
    }

    #[tokio::test]
    async fn test_attach_to_missing_user_removes_blob() {
        // Scenario: upload targeting userId 9999 which does not exist
        let gateway = MockGateway::default();
        let blobs = MemoryBlobStore::default();

        let result = UploadService::store_photo(
            &gateway,
            &blobs,
            UploadTarget::AttachToUser(9999),
            image(),
            BASE,
        )
        .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(blobs.len(), 0);
        assert_eq!(gateway.photo_count(), 0);
    }

    #[tokio::test]
    async fn test_attach_to_post_success() {
        let gateway = MockGateway::with_post(7);
        let blobs = MemoryBlobStore::default();

        let photo = UploadService::store_photo(
            &gateway,
            &blobs,
            UploadTarget::AttachToPost(7),
            image(),
            BASE,
        )
        .await
        .unwrap();

        assert_eq!(photo.post_id, Some(7));
        assert_eq!(photo.user_id, None);
        assert!(blobs.contains(&photo.path));
    }

    #[tokio::test]
    async fn test_attach_to_missing_post_removes_blob() {
        let gateway = MockGateway::default();
        let blobs = MemoryBlobStore::default();

        let result = UploadService::store_photo(
            &gateway,
            &blobs,
            UploadTarget::AttachToPost(42),
            image(),
            BASE,
        )
        .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(blobs.len(), 0);
    }

    #[tokio::test]
    async fn test_replace_photo_success_deletes_old_blob() {
        // Scenario: replace photo 5 whose old blob lives at p/old.jpg
        let gateway = MockGateway::with_photo(5, "p/old.jpg");
        let blobs = MemoryBlobStore::default();
        blobs.insert("p/old.jpg", b"old");

        let photo = UploadService::store_photo(
            &gateway,
            &blobs,
            UploadTarget::ReplacePhoto(5),
            image(),
            BASE,
        )
        .await
        .unwrap();

        assert!(!blobs.contains("p/old.jpg"));
        assert!(blobs.contains(&photo.path));
        assert_ne!(photo.path, "p/old.jpg");
        // The row now references the new blob
        let row = gateway.find_photo(5).await.unwrap().unwrap();
        assert_eq!(row.path, photo.path);
    }

    #[tokio::test]
    async fn test_replace_missing_photo_removes_new_blob() {
        let gateway = MockGateway::default();
        let blobs = MemoryBlobStore::default();

        let result = UploadService::store_photo(
            &gateway,
            &blobs,
            UploadTarget::ReplacePhoto(5),
            image(),
            BASE,
        )
        .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(blobs.len(), 0);
    }

    #[tokio::test]
    async fn test_database_failure_removes_blob_and_propagates() {
        let mut gateway = MockGateway::with_user(1);
        gateway.fail_writes = true;
        let blobs = MemoryBlobStore::default();

        let result = UploadService::store_photo(
            &gateway,
            &blobs,
            UploadTarget::AttachToUser(1),
            image(),
            BASE,
        )
        .await;

        // The gateway's uniqueness failure surfaces unchanged
        assert!(matches!(result, Err(ApiError::Conflict(_))));
        assert_eq!(blobs.len(), 0);
    }

    #[tokio::test]
    async fn test_replace_database_failure_removes_new_blob() {
        // The old blob is already deleted when the row write fails; the
        // compensation still removes the new blob and the error surfaces
        let mut gateway = MockGateway::with_photo(5, "p/old.jpg");
        gateway.fail_writes = true;
        let blobs = MemoryBlobStore::default();
        blobs.insert("p/old.jpg", b"old");

        let result = UploadService::store_photo(
            &gateway,
            &blobs,
            UploadTarget::ReplacePhoto(5),
            image(),
            BASE,
        )
        .await;

        assert!(matches!(result, Err(ApiError::DatabaseError(_))));
        assert_eq!(blobs.len(), 0);
        // The row keeps pointing at the old path
        let row = gateway.find_photo(5).await.unwrap().unwrap();
        assert_eq!(row.path, "p/old.jpg");
    }

    #[tokio::test]
    async fn test_failed_compensating_delete_is_swallowed() {
        let gateway = MockGateway::default();
        let blobs = MemoryBlobStore::failing_deletes();

        let result = UploadService::store_photo(
            &gateway,
            &blobs,
            UploadTarget::AttachToUser(9999),
            image(),
            BASE,
        )
        .await;

        // The original NotFound is reported, not the delete failure
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
