//! Gallery media validation and storage keys.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest accepted image, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Required prefix of an accepted MIME type.
const IMAGE_MIME_PREFIX: &str = "image/";

/// Why one file of an upload batch failed.
///
/// The first two variants come from local validation and are raised before
/// any storage call; the rest map storage backend failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// Not an image.
    #[error("{file_name} is not an image")]
    InvalidFileType {
        /// Original file name.
        file_name: String,
    },
    /// Larger than [`MAX_IMAGE_BYTES`].
    #[error("{file_name} is larger than 5 MB ({size} bytes)")]
    FileTooLarge {
        /// Original file name.
        file_name: String,
        /// Actual size in bytes.
        size: u64,
    },
    /// Storage refused the write.
    #[error("permission denied by storage")]
    PermissionDenied,
    /// The write was interrupted.
    #[error("upload canceled")]
    Canceled,
    /// Storage is full.
    #[error("storage quota exceeded")]
    QuotaExceeded,
    /// Storage rejected the object key or payload.
    #[error("invalid format")]
    InvalidFormat,
    /// Anything else, including a failure to register the gallery record.
    #[error("upload failed: {0}")]
    Failure(String),
}

/// Check a file's declared MIME type and size before uploading it.
///
/// # Errors
///
/// Returns [`UploadError::InvalidFileType`] when `content_type` is missing or
/// does not start with `image/`, and [`UploadError::FileTooLarge`] when
/// `size` exceeds [`MAX_IMAGE_BYTES`].
pub fn validate_image(
    file_name: &str,
    content_type: Option<&str>,
    size: u64,
) -> Result<(), UploadError> {
    let is_image = content_type.is_some_and(|ct| ct.trim().starts_with(IMAGE_MIME_PREFIX));
    if !is_image {
        return Err(UploadError::InvalidFileType {
            file_name: file_name.to_owned(),
        });
    }

    if size > MAX_IMAGE_BYTES {
        return Err(UploadError::FileTooLarge {
            file_name: file_name.to_owned(),
            size,
        });
    }

    Ok(())
}

/// Replace every character other than ASCII alphanumerics, `.` and `-` with `_`.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Location of a stored object: `{prefix}/{millis}_{token}_{sanitized name}`.
///
/// The timestamp and the random token keep keys unique even when the same
/// file is uploaded twice in one batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Build a key under `prefix` for `file_name`.
    ///
    /// `token` should be random; callers generate it so this stays deterministic.
    #[must_use]
    pub fn generate(prefix: &str, file_name: &str, at: DateTime<Utc>, token: &str) -> Self {
        let prefix = prefix.trim_matches('/');
        let name = sanitize_file_name(file_name);
        let millis = at.timestamp_millis();
        if prefix.is_empty() {
            Self(format!("{millis}_{token}_{name}"))
        } else {
            Self(format!("{prefix}/{millis}_{token}_{name}"))
        }
    }

    /// Wrap a key read back from a gallery record or a storage listing.
    #[must_use]
    pub fn from_stored(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upload time encoded in a generated key, or `None` for keys that do
    /// not follow the `{millis}_{token}_{name}` layout.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let file = self.0.rsplit('/').next()?;
        let (millis, _) = file.split_once('_')?;
        DateTime::from_timestamp_millis(millis.parse().ok()?)
    }

    /// Whether the key is safe to map onto a path: relative, no `..` or empty
    /// segments, no backslashes.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty()
            && !self.0.starts_with('/')
            && !self.0.contains('\\')
            && self.0.split('/').all(|seg| !seg.is_empty() && seg != "..")
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
