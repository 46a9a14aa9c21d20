//! Backend collaborators: the document store and the object store.
//!
//! Handlers and services only see these traits. Two implementations ship
//! with the crate:
//!
//! - [`memory`] - mutex-guarded collections for tests and local development
//! - [`crate::db`] - `PostgreSQL` repositories (feature `postgres`)
//!
//! Object storage on disk lives in the admin binary, which is the only writer.

pub mod memory;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Booking, GalleryImage, NewBooking, NewGalleryImage, NewUser, User};
use crate::types::{BookingId, BookingStatus, GalleryImageId, Phone, StorageKey, UploadError, UserId};

pub use memory::{MemoryBookingLedger, MemoryGalleryCatalog, MemoryObjectStorage, MemoryUserDirectory};

/// Errors that can occur during document-store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backend failed (connection, query, I/O).
    #[error("backend error: {0}")]
    Backend(String),

    /// Stored data could not be read back into a domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate phone).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Self::Conflict(db_err.message().to_owned())
            }
            other => Self::Backend(other.to_string()),
        }
    }
}

/// User records, keyed by canonical phone.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the backend is unreachable.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// The user with `phone`, if any.
    ///
    /// The default scans [`UserDirectory::list`]; indexed backends override it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the backend is unreachable.
    async fn find_by_phone(&self, phone: &Phone) -> Result<Option<User>, RepositoryError> {
        let users = self.list().await?;
        Ok(users.into_iter().find(|user| &user.phone == phone))
    }

    /// Insert a user. The phone check and the insert happen atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the phone is already registered.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Set or clear the administrator flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has `phone`.
    async fn set_admin(&self, phone: &Phone, is_admin: bool) -> Result<User, RepositoryError>;

    /// Cheap reachability check for readiness endpoints.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the backend is unreachable.
    async fn health_check(&self) -> Result<(), RepositoryError>;
}

/// Gallery image records.
#[async_trait]
pub trait GalleryCatalog: Send + Sync {
    /// All records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the backend is unreachable.
    async fn list(&self) -> Result<Vec<GalleryImage>, RepositoryError>;

    /// Insert a record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the write fails.
    async fn create(&self, image: NewGalleryImage) -> Result<GalleryImage, RepositoryError>;

    /// Remove a record and return it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no record has `id`.
    async fn delete(&self, id: GalleryImageId) -> Result<GalleryImage, RepositoryError>;
}

/// Delivery bookings.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Insert a pending booking.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the write fails.
    async fn create(&self, booking: NewBooking) -> Result<Booking, RepositoryError>;

    /// All bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the backend is unreachable.
    async fn list(&self) -> Result<Vec<Booking>, RepositoryError>;

    /// One customer's bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the backend is unreachable.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Booking>, RepositoryError>;

    /// Move a booking to `status`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no booking has `id`.
    async fn set_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<Booking, RepositoryError>;
}

/// Errors reported by an [`ObjectStorage`] backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("operation canceled")]
    Canceled,
    #[error("quota exceeded")]
    QuotaExceeded,
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Other(String),
}

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::PermissionDenied => Self::PermissionDenied,
            StorageError::Canceled => Self::Canceled,
            StorageError::QuotaExceeded => Self::QuotaExceeded,
            StorageError::InvalidFormat(_) => Self::InvalidFormat,
            StorageError::NotFound(key) => Self::Failure(format!("object vanished: {key}")),
            StorageError::Other(msg) => Self::Failure(msg),
        }
    }
}

/// Custom metadata attached to an uploaded object.
pub type ObjectMetadata = BTreeMap<String, String>;

/// Handle to an object that has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: StorageKey,
    pub content_type: String,
    pub size: u64,
    pub metadata: ObjectMetadata,
}

/// Blob storage for gallery images.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write `bytes` under `key`.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` describing why the write was refused.
    async fn put(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: ObjectMetadata,
    ) -> Result<StoredObject, StorageError>;

    /// Durable public URL for a stored object.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the object is gone.
    async fn download_url(&self, object: &StoredObject) -> Result<String, StorageError>;

    /// Remove an object.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the object does not exist.
    async fn delete(&self, key: &StorageKey) -> Result<(), StorageError>;

    /// Keys of all objects under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the listing fails.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<StorageKey>, StorageError>;
}

/// The document-store backends a binary runs against.
#[derive(Clone)]
pub struct Backends {
    pub users: Arc<dyn UserDirectory>,
    pub gallery: Arc<dyn GalleryCatalog>,
    pub bookings: Arc<dyn BookingLedger>,
}

impl Backends {
    /// Fresh, empty in-memory backends.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserDirectory::default()),
            gallery: Arc::new(MemoryGalleryCatalog::default()),
            bookings: Arc::new(MemoryBookingLedger::default()),
        }
    }

    /// `PostgreSQL` repositories sharing one pool.
    #[cfg(feature = "postgres")]
    #[must_use]
    pub fn postgres(pool: &sqlx::PgPool) -> Self {
        use crate::db::{PgBookingLedger, PgGalleryCatalog, PgUserDirectory};

        Self {
            users: Arc::new(PgUserDirectory::new(pool.clone())),
            gallery: Arc::new(PgGalleryCatalog::new(pool.clone())),
            bookings: Arc::new(PgBookingLedger::new(pool.clone())),
        }
    }
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends").finish_non_exhaustive()
    }
}
