//! Gallery maintenance: batch uploads, deletion, orphan reconciliation.
//!
//! Every file of a batch is validated locally first. Valid files then run
//! concurrently through upload, URL resolution and record creation; one
//! failing file never cancels its siblings.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use rand::Rng;
use rand::distr::Alphanumeric;
use thiserror::Error;
use tracing::instrument;

use tandaro_core::{
    GalleryCatalog, GalleryImage, GalleryImageId, Language, NewGalleryImage, ObjectMetadata,
    ObjectStorage, RepositoryError, StorageError, StorageKey, Text, UploadError, validate_image,
};

/// Length of the random token in a storage key.
const KEY_TOKEN_LEN: usize = 8;

/// Minimum age of an unreferenced object before it counts as orphaned.
/// Younger objects may belong to an upload whose record is not written yet.
pub const ORPHAN_GRACE: Duration = Duration::from_secs(60 * 60);

/// One file received from the upload form.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A file that did not make it into the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpload {
    pub file_name: String,
    pub error: UploadError,
}

/// Outcome of one upload batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Created records, in completion order.
    pub succeeded: Vec<GalleryImage>,
    pub failed: Vec<FailedUpload>,
}

impl BatchReport {
    /// Number of files in the batch.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// What deleting a gallery entry removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Only the record; the stored object is left for reconciliation.
    #[default]
    RecordOnly,
    /// The record and its stored object.
    RecordAndObject,
}

impl DeleteMode {
    /// Mode selected by the delete form's checkbox.
    #[must_use]
    pub const fn from_checkbox(checked: bool) -> Self {
        if checked {
            Self::RecordAndObject
        } else {
            Self::RecordOnly
        }
    }
}

/// A removed gallery entry.
#[derive(Debug)]
pub struct Deleted {
    pub image: GalleryImage,
    /// Whether the stored object is gone too.
    pub object_removed: bool,
}

/// Result of purging orphaned objects.
#[derive(Debug, Default)]
pub struct PurgeReport {
    pub removed: Vec<StorageKey>,
    pub failed: Vec<(StorageKey, StorageError)>,
}

/// Gallery maintenance errors outside the per-file upload path.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Gallery service over a catalog and an object store.
pub struct GalleryService<'a> {
    catalog: &'a dyn GalleryCatalog,
    storage: &'a dyn ObjectStorage,
    prefix: &'a str,
    orphan_grace: Duration,
}

impl<'a> GalleryService<'a> {
    /// Create a gallery service writing keys under `prefix`.
    #[must_use]
    pub const fn new(
        catalog: &'a dyn GalleryCatalog,
        storage: &'a dyn ObjectStorage,
        prefix: &'a str,
    ) -> Self {
        Self {
            catalog,
            storage,
            prefix,
            orphan_grace: ORPHAN_GRACE,
        }
    }

    /// Override the minimum orphan age.
    #[must_use]
    pub const fn with_orphan_grace(mut self, grace: Duration) -> Self {
        self.orphan_grace = grace;
        self
    }

    /// All gallery records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog is unreachable.
    pub async fn list(&self) -> Result<Vec<GalleryImage>, RepositoryError> {
        self.catalog.list().await
    }

    /// Upload a batch of files.
    ///
    /// New records get the default title and description in `lang` and carry
    /// `uploader` as their uploader tag.
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn upload_batch(
        &self,
        files: Vec<UploadFile>,
        uploader: &str,
        lang: Language,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        let mut accepted = Vec::with_capacity(files.len());

        for file in files {
            let size = file.bytes.len() as u64;
            match validate_image(&file.file_name, file.content_type.as_deref(), size) {
                Ok(()) => accepted.push(file),
                Err(error) => {
                    tracing::info!(file_name = %file.file_name, error = %error, "Upload rejected");
                    report.failed.push(FailedUpload {
                        file_name: file.file_name,
                        error,
                    });
                }
            }
        }

        // The thread-local RNG is not `Send`; draw every token before awaiting.
        let tokens: Vec<String> = {
            let mut rng = rand::rng();
            accepted
                .iter()
                .map(|_| {
                    (&mut rng)
                        .sample_iter(&Alphanumeric)
                        .take(KEY_TOKEN_LEN)
                        .map(char::from)
                        .collect()
                })
                .collect()
        };

        let mut pending: FuturesUnordered<_> = accepted
            .into_iter()
            .zip(tokens)
            .map(|(file, token)| self.upload_one(file, token, uploader, lang))
            .collect();

        while let Some((file_name, result)) = pending.next().await {
            match result {
                Ok(image) => {
                    tracing::info!(image_id = %image.id, key = %image.storage_key, "Image uploaded");
                    report.succeeded.push(image);
                }
                Err(error) => {
                    tracing::warn!(file_name = %file_name, error = %error, "Upload failed");
                    report.failed.push(FailedUpload { file_name, error });
                }
            }
        }

        report
    }

    async fn upload_one(
        &self,
        file: UploadFile,
        token: String,
        uploader: &str,
        lang: Language,
    ) -> (String, Result<GalleryImage, UploadError>) {
        let now = Utc::now();
        let key = StorageKey::generate(self.prefix, &file.file_name, now, &token);
        let result = self.store(&file, key, now, uploader, lang).await;
        (file.file_name, result)
    }

    async fn store(
        &self,
        file: &UploadFile,
        key: StorageKey,
        now: DateTime<Utc>,
        uploader: &str,
        lang: Language,
    ) -> Result<GalleryImage, UploadError> {
        let metadata = ObjectMetadata::from([
            ("original_name".to_string(), file.file_name.clone()),
            ("uploaded_at".to_string(), now.to_rfc3339()),
            ("uploaded_by".to_string(), uploader.to_string()),
        ]);
        let content_type = file.content_type.as_deref().unwrap_or_default();

        let stored = self
            .storage
            .put(&key, file.bytes.clone(), content_type, metadata)
            .await?;
        let url = self.storage.download_url(&stored).await?;

        let record = NewGalleryImage {
            url,
            title: Text::DefaultImageTitle.tr(lang).to_string(),
            description: Text::DefaultImageDescription.tr(lang).to_string(),
            file_name: file.file_name.clone(),
            uploaded_by: uploader.to_string(),
            storage_key: key,
            created_at: now,
        };
        self.catalog.create(record).await.map_err(|e| {
            tracing::warn!(key = %stored.key, "Stored object has no gallery record");
            UploadError::Failure(e.to_string())
        })
    }

    /// Delete a gallery record, and its stored object if `mode` asks for it.
    ///
    /// An object that is already gone counts as removed. Other storage
    /// failures are logged; the record stays deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no record has `id`.
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        id: GalleryImageId,
        mode: DeleteMode,
    ) -> Result<Deleted, RepositoryError> {
        let image = self.catalog.delete(id).await?;

        let object_removed = match mode {
            DeleteMode::RecordOnly => false,
            DeleteMode::RecordAndObject => match self.storage.delete(&image.storage_key).await {
                Ok(()) | Err(StorageError::NotFound(_)) => true,
                Err(e) => {
                    tracing::error!(key = %image.storage_key, error = %e, "Failed to delete stored object");
                    false
                }
            },
        };

        tracing::info!(image_id = %image.id, object_removed, "Gallery image deleted");
        Ok(Deleted {
            image,
            object_removed,
        })
    }

    /// Stored keys under the gallery prefix that no record references and
    /// that were uploaded at least the orphan grace period ago.
    ///
    /// Keys without an upload time are never reported.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError` if either backend fails.
    pub async fn find_orphans(&self) -> Result<Vec<StorageKey>, GalleryError> {
        let stored = self.storage.list_keys(self.prefix).await?;
        let records = self.catalog.list().await?;
        let cutoff = TimeDelta::from_std(self.orphan_grace)
            .ok()
            .and_then(|grace| Utc::now().checked_sub_signed(grace));

        Ok(stored
            .into_iter()
            .filter(|key| !records.iter().any(|img| &img.storage_key == key))
            .filter(|key| {
                let settled = key
                    .created_at()
                    .zip(cutoff)
                    .is_some_and(|(at, cutoff)| at <= cutoff);
                if !settled {
                    tracing::debug!(key = %key, "Skipping recent or foreign object");
                }
                settled
            })
            .collect())
    }

    /// Delete every orphaned object.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError` if the orphan scan fails. Per-object failures
    /// are collected in the report.
    #[instrument(skip(self))]
    pub async fn purge_orphans(&self) -> Result<PurgeReport, GalleryError> {
        let mut report = PurgeReport::default();
        for key in self.find_orphans().await? {
            match self.storage.delete(&key).await {
                Ok(()) => report.removed.push(key),
                Err(e) => report.failed.push((key, e)),
            }
        }
        tracing::info!(
            removed = report.removed.len(),
            failed = report.failed.len(),
            "Orphan purge finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tandaro_core::MAX_IMAGE_BYTES;
    use tandaro_core::backend::{MemoryGalleryCatalog, MemoryObjectStorage};

    use super::*;

    fn file(name: &str, content_type: &str, size: usize) -> UploadFile {
        UploadFile {
            file_name: name.to_string(),
            content_type: Some(content_type.to_string()),
            bytes: vec![0; size],
        }
    }

    struct Fixture {
        catalog: MemoryGalleryCatalog,
        storage: MemoryObjectStorage,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: MemoryGalleryCatalog::default(),
                storage: MemoryObjectStorage::new("http://media.test"),
            }
        }

        fn service(&self) -> GalleryService<'_> {
            GalleryService::new(&self.catalog, &self.storage, "gallery")
                .with_orphan_grace(Duration::ZERO)
        }

        async fn put_raw(&self, key: &StorageKey) {
            self.storage
                .put(key, vec![1], "image/jpeg", ObjectMetadata::new())
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn batch_with_invalid_middle_file() {
        let fx = Fixture::new();
        let files = vec![
            file("van.jpg", "image/jpeg", 10),
            file("notes.txt", "text/plain", 10),
            file("truck.png", "image/png", 10),
        ];

        let report = fx
            .service()
            .upload_batch(files, "admin", Language::English)
            .await;

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded.len(), 2);
        assert_eq!(
            report.failed,
            vec![FailedUpload {
                file_name: "notes.txt".to_string(),
                error: UploadError::InvalidFileType {
                    file_name: "notes.txt".to_string()
                },
            }]
        );
        assert_eq!(fx.storage.len(), 2);
        assert_eq!(fx.catalog.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn five_mib_is_the_inclusive_limit() {
        let fx = Fixture::new();
        let limit = usize::try_from(MAX_IMAGE_BYTES).unwrap();
        let files = vec![
            file("exact.jpg", "image/jpeg", limit),
            file("over.jpg", "image/jpeg", limit + 1),
        ];

        let report = fx
            .service()
            .upload_batch(files, "admin", Language::English)
            .await;

        assert_eq!(report.succeeded.len(), 1);
        assert_eq!(report.succeeded[0].file_name, "exact.jpg");
        assert!(matches!(
            report.failed[0].error,
            UploadError::FileTooLarge { ref file_name, .. } if file_name == "over.jpg"
        ));
    }

    #[tokio::test]
    async fn record_carries_key_url_and_defaults() {
        let fx = Fixture::new();
        let report = fx
            .service()
            .upload_batch(
                vec![file("my van!.jpg", "image/jpeg", 3)],
                "ops-team",
                Language::English,
            )
            .await;

        let image = &report.succeeded[0];
        let key = image.storage_key.as_str();
        assert!(key.starts_with("gallery/"));
        assert!(key.ends_with("_my_van_.jpg"));
        assert_eq!(image.url, format!("http://media.test/{key}"));
        assert_eq!(image.title, "New photo");
        assert_eq!(image.description, "From the Tandaro fleet");
        assert_eq!(image.file_name, "my van!.jpg");
        assert_eq!(image.uploaded_by, "ops-team");
    }

    #[tokio::test]
    async fn same_file_twice_gets_distinct_keys() {
        let fx = Fixture::new();
        let report = fx
            .service()
            .upload_batch(
                vec![file("a.jpg", "image/jpeg", 1), file("a.jpg", "image/jpeg", 1)],
                "admin",
                Language::Arabic,
            )
            .await;

        assert_eq!(report.succeeded.len(), 2);
        assert_ne!(
            report.succeeded[0].storage_key,
            report.succeeded[1].storage_key
        );
    }

    #[tokio::test]
    async fn storage_failure_is_reported_per_file() {
        let fx = Fixture::new();
        fx.storage
            .fail_puts_containing("full", StorageError::QuotaExceeded);

        let report = fx
            .service()
            .upload_batch(
                vec![
                    file("full.jpg", "image/jpeg", 1),
                    file("fine.jpg", "image/jpeg", 1),
                ],
                "admin",
                Language::Hebrew,
            )
            .await;

        assert_eq!(report.succeeded.len(), 1);
        assert_eq!(
            report.failed,
            vec![FailedUpload {
                file_name: "full.jpg".to_string(),
                error: UploadError::QuotaExceeded,
            }]
        );
        assert!(fx.catalog.list().await.unwrap().iter().all(|i| i.file_name == "fine.jpg"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn read_only_media_root_fails_with_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        use crate::storage::LocalObjectStorage;

        let dir = tempfile::tempdir().unwrap();
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o555)).unwrap();
        // Privileged users write through the mode bits.
        if std::fs::write(dir.path().join("writable"), b"").is_ok() {
            return;
        }
        let catalog = MemoryGalleryCatalog::default();
        let storage = LocalObjectStorage::new(dir.path(), "http://media.test");

        let report = GalleryService::new(&catalog, &storage, "gallery")
            .upload_batch(vec![file("van.jpg", "image/jpeg", 4)], "admin", Language::English)
            .await;

        assert!(report.succeeded.is_empty());
        assert_eq!(
            report.failed,
            vec![FailedUpload {
                file_name: "van.jpg".to_string(),
                error: UploadError::PermissionDenied,
            }]
        );
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_record_only_leaves_orphan() {
        let fx = Fixture::new();
        let service = fx.service();
        let report = service
            .upload_batch(vec![file("a.jpg", "image/jpeg", 1)], "admin", Language::English)
            .await;
        let image = &report.succeeded[0];

        let deleted = service.delete(image.id, DeleteMode::RecordOnly).await.unwrap();
        assert!(!deleted.object_removed);
        assert_eq!(fx.storage.len(), 1);
        assert_eq!(
            service.find_orphans().await.unwrap(),
            vec![image.storage_key.clone()]
        );

        let purge = service.purge_orphans().await.unwrap();
        assert_eq!(purge.removed, vec![image.storage_key.clone()]);
        assert!(fx.storage.is_empty());
    }

    #[tokio::test]
    async fn recent_unreferenced_object_is_not_purged() {
        let fx = Fixture::new();
        let service = GalleryService::new(&fx.catalog, &fx.storage, "gallery");
        let fresh = StorageKey::generate("gallery", "a.jpg", Utc::now(), "fresh123");
        let stale = StorageKey::generate(
            "gallery",
            "b.jpg",
            Utc::now() - TimeDelta::hours(2),
            "stale123",
        );
        let foreign = StorageKey::from_stored("gallery/handmade.jpg");
        for key in [&fresh, &stale, &foreign] {
            fx.put_raw(key).await;
        }

        assert_eq!(service.find_orphans().await.unwrap(), vec![stale.clone()]);

        let purge = service.purge_orphans().await.unwrap();
        assert_eq!(purge.removed, vec![stale]);
        assert_eq!(fx.storage.len(), 2);
    }

    #[tokio::test]
    async fn delete_record_and_object() {
        let fx = Fixture::new();
        let service = fx.service();
        let report = service
            .upload_batch(vec![file("a.jpg", "image/jpeg", 1)], "admin", Language::English)
            .await;

        let deleted = service
            .delete(report.succeeded[0].id, DeleteMode::RecordAndObject)
            .await
            .unwrap();
        assert!(deleted.object_removed);
        assert!(fx.storage.is_empty());
        assert!(service.find_orphans().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let fx = Fixture::new();
        let err = fx
            .service()
            .delete(GalleryImageId::new(99), DeleteMode::RecordOnly)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn checkbox_selects_delete_mode() {
        assert_eq!(DeleteMode::from_checkbox(false), DeleteMode::RecordOnly);
        assert_eq!(DeleteMode::from_checkbox(true), DeleteMode::RecordAndObject);
        assert_eq!(DeleteMode::default(), DeleteMode::RecordOnly);
    }
}
