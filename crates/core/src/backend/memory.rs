//! In-memory backends.
//!
//! Each collection sits behind a `std::sync::Mutex`. Locks are taken and
//! released inside a single synchronous block and never held across an
//! `.await`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{
    BookingLedger, GalleryCatalog, ObjectMetadata, ObjectStorage, RepositoryError, StorageError,
    StoredObject, UserDirectory,
};
use crate::models::{Booking, GalleryImage, NewBooking, NewGalleryImage, NewUser, User};
use crate::types::{BookingId, BookingStatus, GalleryImageId, Phone, StorageKey, UserId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock cannot leave these collections half-written.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: Vec::new(),
        }
    }
}

impl<T> Table<T> {
    const fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Users held in memory.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    table: Mutex<Table<User>>,
    calls: AtomicUsize,
}

impl MemoryUserDirectory {
    /// Number of trait calls served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        self.record_call();
        Ok(lock(&self.table).rows.clone())
    }

    async fn find_by_phone(&self, phone: &Phone) -> Result<Option<User>, RepositoryError> {
        self.record_call();
        let table = lock(&self.table);
        Ok(table.rows.iter().find(|u| &u.phone == phone).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.record_call();
        let mut table = lock(&self.table);
        if table.rows.iter().any(|u| u.phone == user.phone) {
            return Err(RepositoryError::Conflict(format!(
                "phone {} already registered",
                user.phone
            )));
        }

        let created = User {
            id: UserId::new(table.allocate_id()),
            name: user.name,
            phone: user.phone,
            created_at: user.created_at,
            is_admin: false,
        };
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn set_admin(&self, phone: &Phone, is_admin: bool) -> Result<User, RepositoryError> {
        self.record_call();
        let mut table = lock(&self.table);
        let user = table
            .rows
            .iter_mut()
            .find(|u| &u.phone == phone)
            .ok_or(RepositoryError::NotFound)?;
        user.is_admin = is_admin;
        Ok(user.clone())
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Gallery records held in memory.
#[derive(Debug, Default)]
pub struct MemoryGalleryCatalog {
    table: Mutex<Table<GalleryImage>>,
}

#[async_trait]
impl GalleryCatalog for MemoryGalleryCatalog {
    async fn list(&self) -> Result<Vec<GalleryImage>, RepositoryError> {
        Ok(lock(&self.table).rows.clone())
    }

    async fn create(&self, image: NewGalleryImage) -> Result<GalleryImage, RepositoryError> {
        let mut table = lock(&self.table);
        let created = GalleryImage {
            id: GalleryImageId::new(table.allocate_id()),
            url: image.url,
            title: image.title,
            description: image.description,
            file_name: image.file_name,
            uploaded_by: image.uploaded_by,
            storage_key: image.storage_key,
            created_at: image.created_at,
        };
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: GalleryImageId) -> Result<GalleryImage, RepositoryError> {
        let mut table = lock(&self.table);
        let pos = table
            .rows
            .iter()
            .position(|img| img.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(table.rows.remove(pos))
    }
}

/// Bookings held in memory.
#[derive(Debug, Default)]
pub struct MemoryBookingLedger {
    table: Mutex<Table<Booking>>,
}

fn newest_first(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    bookings
}

#[async_trait]
impl BookingLedger for MemoryBookingLedger {
    async fn create(&self, booking: NewBooking) -> Result<Booking, RepositoryError> {
        let mut table = lock(&self.table);
        let created = Booking {
            id: BookingId::new(table.allocate_id()),
            user_id: booking.user_id,
            customer_name: booking.customer_name,
            phone: booking.phone,
            pickup_address: booking.request.pickup_address,
            dropoff_address: booking.request.dropoff_address,
            scheduled_for: booking.request.scheduled_for,
            notes: booking.request.notes,
            status: BookingStatus::Pending,
            created_at: booking.created_at,
        };
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Booking>, RepositoryError> {
        let rows = lock(&self.table).rows.clone();
        Ok(newest_first(rows))
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Booking>, RepositoryError> {
        let rows: Vec<Booking> = lock(&self.table)
            .rows
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn set_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<Booking, RepositoryError> {
        let mut table = lock(&self.table);
        let booking = table
            .rows
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(RepositoryError::NotFound)?;
        booking.status = status;
        Ok(booking.clone())
    }
}

#[derive(Debug, Clone)]
struct MemoryObject {
    bytes: Vec<u8>,
    stored: StoredObject,
}

/// Objects held in memory, served from `base_url`.
///
/// Writes whose key contains a registered fragment fail with the registered
/// error, which lets tests exercise partial batch failures.
#[derive(Debug)]
pub struct MemoryObjectStorage {
    base_url: String,
    objects: Mutex<BTreeMap<String, MemoryObject>>,
    failures: Mutex<Vec<(String, StorageError)>>,
}

impl MemoryObjectStorage {
    /// Empty storage whose download URLs start with `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            objects: Mutex::new(BTreeMap::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Make every `put` whose key contains `fragment` fail with `error`.
    pub fn fail_puts_containing(&self, fragment: impl Into<String>, error: StorageError) {
        lock(&self.failures).push((fragment.into(), error));
    }

    /// Bytes stored under `key`, if any.
    #[must_use]
    pub fn bytes(&self, key: &StorageKey) -> Option<Vec<u8>> {
        lock(&self.objects)
            .get(key.as_str())
            .map(|obj| obj.bytes.clone())
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.objects).len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.objects).is_empty()
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn put(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: ObjectMetadata,
    ) -> Result<StoredObject, StorageError> {
        if !key.is_well_formed() {
            return Err(StorageError::InvalidFormat(key.to_string()));
        }
        let injected = lock(&self.failures)
            .iter()
            .find(|(fragment, _)| key.as_str().contains(fragment.as_str()))
            .map(|(_, err)| err.clone());
        if let Some(err) = injected {
            return Err(err);
        }

        let stored = StoredObject {
            key: key.clone(),
            content_type: content_type.to_owned(),
            size: bytes.len() as u64,
            metadata,
        };
        lock(&self.objects).insert(
            key.as_str().to_owned(),
            MemoryObject {
                bytes,
                stored: stored.clone(),
            },
        );
        Ok(stored)
    }

    async fn download_url(&self, object: &StoredObject) -> Result<String, StorageError> {
        let objects = lock(&self.objects);
        let found = objects
            .get(object.key.as_str())
            .ok_or_else(|| StorageError::NotFound(object.key.to_string()))?;
        Ok(format!("{}/{}", self.base_url, found.stored.key))
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), StorageError> {
        lock(&self.objects)
            .remove(key.as_str())
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<StorageKey>, StorageError> {
        let prefix = prefix.trim_matches('/');
        Ok(lock(&self.objects)
            .keys()
            .filter(|key| prefix.is_empty() || key.starts_with(&format!("{prefix}/")))
            .map(|key| StorageKey::from_stored(key.clone()))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::types::BookingRequest;

    fn new_user(name: &str, phone: &str) -> NewUser {
        NewUser {
            name: name.to_owned(),
            phone: Phone::parse(phone).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn default_backends_start_empty() {
        let backends = crate::backend::Backends::in_memory();
        assert!(backends.users.list().await.unwrap().is_empty());
        assert!(backends.gallery.list().await.unwrap().is_empty());
        assert!(backends.bookings.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_assigns_ids_and_rejects_duplicate_phone() {
        let users = MemoryUserDirectory::default();
        let first = users.create(new_user("Lina", "0501234567")).await.unwrap();
        assert_eq!(first.id, UserId::new(1));
        assert!(!first.is_admin);

        let dup = users.create(new_user("Other", "+972 50 123 4567")).await;
        assert!(matches!(dup, Err(RepositoryError::Conflict(_))));
        assert_eq!(users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn find_by_phone_matches_canonical_form() {
        let users = MemoryUserDirectory::default();
        users.create(new_user("Lina", "0501234567")).await.unwrap();
        let phone = Phone::parse("972-50-123-4567").unwrap();
        let found = users.find_by_phone(&phone).await.unwrap();
        assert_eq!(found.map(|u| u.name), Some("Lina".to_owned()));
    }

    #[tokio::test]
    async fn set_admin_flips_flag() {
        let users = MemoryUserDirectory::default();
        let created = users.create(new_user("Sami", "0529876543")).await.unwrap();
        let updated = users.set_admin(&created.phone, true).await.unwrap();
        assert!(updated.is_admin);

        let missing = Phone::parse("0541111111").unwrap();
        assert!(matches!(
            users.set_admin(&missing, true).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn gallery_keeps_insertion_order_and_deletes() {
        let gallery = MemoryGalleryCatalog::default();
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            gallery
                .create(NewGalleryImage {
                    url: format!("http://media/{name}"),
                    title: "t".to_owned(),
                    description: "d".to_owned(),
                    file_name: name.to_owned(),
                    uploaded_by: "admin".to_owned(),
                    storage_key: StorageKey::from_stored(format!("gallery/{name}")),
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        let removed = gallery.delete(GalleryImageId::new(2)).await.unwrap();
        assert_eq!(removed.file_name, "b.jpg");
        let names: Vec<String> = gallery
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.file_name)
            .collect();
        assert_eq!(names, ["a.jpg", "c.jpg"]);
        assert!(matches!(
            gallery.delete(GalleryImageId::new(2)).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn bookings_filter_by_user_and_update_status() {
        let ledger = MemoryBookingLedger::default();
        let scheduled = NaiveDate::from_ymd_opt(2026, 11, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        for user in [1, 2, 1] {
            ledger
                .create(NewBooking {
                    user_id: UserId::new(user),
                    customer_name: "x".to_owned(),
                    phone: Phone::parse("0501234567").unwrap(),
                    request: BookingRequest {
                        pickup_address: "a".to_owned(),
                        dropoff_address: "b".to_owned(),
                        scheduled_for: scheduled,
                        notes: None,
                    },
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        let mine = ledger.list_for_user(UserId::new(1)).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|b| b.status == BookingStatus::Pending));

        let updated = ledger
            .set_status(BookingId::new(2), BookingStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(updated.status, BookingStatus::Confirmed);
        assert!(matches!(
            ledger.set_status(BookingId::new(9), BookingStatus::Cancelled).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn object_storage_round_trip() {
        let storage = MemoryObjectStorage::new("http://media.test/");
        let key = StorageKey::from_stored("gallery/1_tok_a.jpg");
        let stored = storage
            .put(&key, vec![1, 2, 3], "image/jpeg", ObjectMetadata::new())
            .await
            .unwrap();
        assert_eq!(stored.size, 3);
        assert_eq!(
            storage.download_url(&stored).await.unwrap(),
            "http://media.test/gallery/1_tok_a.jpg"
        );
        assert_eq!(storage.list_keys("gallery").await.unwrap(), [key.clone()]);
        assert!(storage.list_keys("other").await.unwrap().is_empty());

        storage.delete(&key).await.unwrap();
        assert!(storage.is_empty());
        assert!(matches!(
            storage.delete(&key).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn injected_failures_apply_to_matching_keys() {
        let storage = MemoryObjectStorage::new("http://media.test");
        storage.fail_puts_containing("full", StorageError::QuotaExceeded);
        let err = storage
            .put(
                &StorageKey::from_stored("gallery/1_t_full.png"),
                vec![0],
                "image/png",
                ObjectMetadata::new(),
            )
            .await;
        assert_eq!(err, Err(StorageError::QuotaExceeded));
    }
}
