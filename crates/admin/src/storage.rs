//! Object storage on the local filesystem.
//!
//! Objects live at `{root}/{key}`. Their content type and custom metadata
//! live in `{root}/.tandaro/meta/{key}.json`. Writes go to a temporary file
//! under `{root}/.tandaro/tmp` first and are renamed into place, so a reader
//! never sees half an image. Keys may not start with the `.tandaro` segment.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

use tandaro_core::{ObjectMetadata, ObjectStorage, StorageError, StorageKey, StoredObject};

/// Top-level directory for bookkeeping files, never addressable by a key.
const RESERVED_DIR: &str = ".tandaro";
const META_DIR: &str = "meta";
const TEMP_DIR: &str = "tmp";
const TEMP_NAME_LEN: usize = 16;

#[derive(Debug, Serialize, Deserialize)]
struct Sidecar {
    content_type: String,
    size: u64,
    metadata: ObjectMetadata,
}

/// Filesystem-backed [`ObjectStorage`].
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    public_url: String,
}

impl LocalObjectStorage {
    /// Store objects under `root`, served publicly at `public_url`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Directory objects are written under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &StorageKey) -> Result<PathBuf, StorageError> {
        let reserved = key.as_str().split('/').next() == Some(RESERVED_DIR);
        if !key.is_well_formed() || reserved {
            return Err(StorageError::InvalidFormat(key.to_string()));
        }
        Ok(self.root.join(key.as_str()))
    }

    fn sidecar_path(&self, key: &StorageKey) -> PathBuf {
        self.root
            .join(RESERVED_DIR)
            .join(META_DIR)
            .join(format!("{key}.json"))
    }

    fn temp_path(&self) -> PathBuf {
        let name: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(TEMP_NAME_LEN)
            .map(char::from)
            .collect();
        self.root.join(RESERVED_DIR).join(TEMP_DIR).join(name)
    }

    async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.temp_path();
        if let Some(parent) = tmp.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp)
            .await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }
}

fn map_io(err: &io::Error, key: &StorageKey) -> StorageError {
    match err.kind() {
        io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
            StorageError::PermissionDenied
        }
        io::ErrorKind::Interrupted => StorageError::Canceled,
        io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded => StorageError::QuotaExceeded,
        io::ErrorKind::InvalidInput => StorageError::InvalidFormat(key.to_string()),
        io::ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
        _ => StorageError::Other(err.to_string()),
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    #[instrument(skip(self, bytes, metadata), fields(key = %key, size = bytes.len()))]
    async fn put(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: ObjectMetadata,
    ) -> Result<StoredObject, StorageError> {
        let path = self.path_for(key)?;
        let size = bytes.len() as u64;
        let sidecar = Sidecar {
            content_type: content_type.to_string(),
            size,
            metadata,
        };
        let sidecar_bytes =
            serde_json::to_vec(&sidecar).map_err(|e| StorageError::Other(e.to_string()))?;

        self.write_atomic(&path, &bytes)
            .await
            .map_err(|e| map_io(&e, key))?;
        self.write_atomic(&self.sidecar_path(key), &sidecar_bytes)
            .await
            .map_err(|e| map_io(&e, key))?;

        Ok(StoredObject {
            key: key.clone(),
            content_type: sidecar.content_type,
            size,
            metadata: sidecar.metadata,
        })
    }

    async fn download_url(&self, object: &StoredObject) -> Result<String, StorageError> {
        let path = self.path_for(&object.key)?;
        match fs::try_exists(&path).await {
            Ok(true) => Ok(format!("{}/{}", self.public_url, object.key)),
            Ok(false) => Err(StorageError::NotFound(object.key.to_string())),
            Err(e) => Err(map_io(&e, &object.key)),
        }
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn delete(&self, key: &StorageKey) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::remove_file(&path).await.map_err(|e| map_io(&e, key))?;

        // A missing sidecar only means the object predates them.
        if let Err(e) = fs::remove_file(self.sidecar_path(key)).await
            && e.kind() != io::ErrorKind::NotFound
        {
            tracing::warn!(key = %key, error = %e, "Failed to remove object metadata");
        }
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<StorageKey>, StorageError> {
        let prefix = prefix.trim_matches('/');
        let start = if prefix.is_empty() {
            self.root.clone()
        } else {
            let key = StorageKey::from_stored(prefix);
            self.path_for(&key)?
        };

        let reserved = self.root.join(RESERVED_DIR);
        let mut keys = Vec::new();
        let mut pending = vec![start];
        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(StorageError::Other(e.to_string())),
            };

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StorageError::Other(e.to_string()))?
            {
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| StorageError::Other(e.to_string()))?;
                if file_type.is_dir() {
                    if path != reserved {
                        pending.push(path);
                    }
                    continue;
                }

                let Ok(relative) = path.strip_prefix(&self.root) else {
                    continue;
                };
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                keys.push(StorageKey::from_stored(key));
            }
        }

        keys.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(keys)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn storage(dir: &tempfile::TempDir) -> LocalObjectStorage {
        LocalObjectStorage::new(dir.path(), "http://localhost:3000/media/")
    }

    fn metadata() -> ObjectMetadata {
        ObjectMetadata::from([("original_name".to_string(), "van.jpg".to_string())])
    }

    #[tokio::test]
    async fn put_writes_object_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let key = StorageKey::from_stored("gallery/1_abc_van.jpg");

        let stored = storage
            .put(&key, b"jpeg".to_vec(), "image/jpeg", metadata())
            .await
            .unwrap();

        assert_eq!(stored.size, 4);
        assert_eq!(
            fs::read(dir.path().join("gallery/1_abc_van.jpg")).await.unwrap(),
            b"jpeg"
        );
        let sidecar: Sidecar = serde_json::from_slice(
            &fs::read(dir.path().join(".tandaro/meta/gallery/1_abc_van.jpg.json"))
                .await
                .unwrap(),
        )
        .unwrap();
        assert_eq!(sidecar.content_type, "image/jpeg");
        assert_eq!(sidecar.metadata, metadata());
    }

    #[tokio::test]
    async fn download_url_uses_public_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let key = StorageKey::from_stored("gallery/1_abc_van.jpg");
        let stored = storage
            .put(&key, b"jpeg".to_vec(), "image/jpeg", metadata())
            .await
            .unwrap();

        assert_eq!(
            storage.download_url(&stored).await.unwrap(),
            "http://localhost:3000/media/gallery/1_abc_van.jpg"
        );

        storage.delete(&key).await.unwrap();
        assert_eq!(
            storage.download_url(&stored).await,
            Err(StorageError::NotFound("gallery/1_abc_van.jpg".to_string()))
        );
    }

    #[tokio::test]
    async fn rejects_keys_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let key = StorageKey::from_stored("../escape.jpg");

        let err = storage
            .put(&key, b"x".to_vec(), "image/jpeg", ObjectMetadata::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat(_)));
    }

    #[tokio::test]
    async fn delete_missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let err = storage
            .delete(&StorageKey::from_stored("gallery/missing.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn bookkeeping_suffixes_are_ordinary_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let keys = ["gallery/1_a_notes.meta.json", "gallery/2_b_draft.tmp"];
        for key in keys {
            storage
                .put(
                    &StorageKey::from_stored(key),
                    b"x".to_vec(),
                    "image/png",
                    ObjectMetadata::new(),
                )
                .await
                .unwrap();
        }

        let listed = storage.list_keys("").await.unwrap();
        let listed: Vec<&str> = listed.iter().map(StorageKey::as_str).collect();
        assert_eq!(listed, keys);
    }

    #[tokio::test]
    async fn reserved_directory_is_not_a_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let err = storage
            .put(
                &StorageKey::from_stored(".tandaro/meta/x.json"),
                b"{}".to_vec(),
                "application/json",
                ObjectMetadata::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat(_)));
        assert!(matches!(
            storage.list_keys(".tandaro").await,
            Err(StorageError::InvalidFormat(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn read_only_root_is_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o555)).unwrap();
        // Privileged users write through the mode bits.
        if std::fs::write(dir.path().join("writable"), b"").is_ok() {
            return;
        }

        let err = storage(&dir)
            .put(
                &StorageKey::from_stored("gallery/1_abc_van.jpg"),
                b"jpeg".to_vec(),
                "image/jpeg",
                ObjectMetadata::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, StorageError::PermissionDenied);
    }

    #[tokio::test]
    async fn list_keys_skips_sidecars_and_other_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        for key in ["gallery/2_b_b.png", "gallery/1_a_a.png", "avatars/x.png"] {
            storage
                .put(
                    &StorageKey::from_stored(key),
                    b"png".to_vec(),
                    "image/png",
                    ObjectMetadata::new(),
                )
                .await
                .unwrap();
        }

        let keys = storage.list_keys("gallery").await.unwrap();
        let keys: Vec<&str> = keys.iter().map(StorageKey::as_str).collect();
        assert_eq!(keys, ["gallery/1_a_a.png", "gallery/2_b_b.png"]);
    }

    #[tokio::test]
    async fn list_keys_of_missing_prefix_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(storage(&dir).list_keys("gallery").await.unwrap().is_empty());
    }
}
