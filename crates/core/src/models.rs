//! Records stored by the backends.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BookingId, BookingRequest, BookingStatus, GalleryImageId, Phone, StorageKey, UserId};

/// A registered customer (or administrator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend-assigned identifier.
    pub id: UserId,
    /// Full name as entered at signup, trimmed.
    pub name: String,
    /// Canonical phone, unique across users.
    pub phone: Phone,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Whether the user may sign in to the admin panel.
    pub is_admin: bool,
}

/// Fields for creating a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub phone: Phone,
    pub created_at: DateTime<Utc>,
}

/// Metadata for one uploaded gallery image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    /// Backend-assigned identifier; listing order follows it.
    pub id: GalleryImageId,
    /// Durable download URL.
    pub url: String,
    pub title: String,
    pub description: String,
    /// File name as uploaded, before sanitizing.
    pub file_name: String,
    /// Tag of whoever uploaded it.
    pub uploaded_by: String,
    /// Where the object lives in storage.
    pub storage_key: StorageKey,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a [`GalleryImage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGalleryImage {
    pub url: String,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub uploaded_by: String,
    pub storage_key: StorageKey,
    pub created_at: DateTime<Utc>,
}

/// A customer's delivery request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    /// Customer name at booking time.
    pub customer_name: String,
    /// Customer phone at booking time.
    pub phone: Phone,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub scheduled_for: NaiveDateTime,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a [`Booking`]. New bookings are always pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub user_id: UserId,
    pub customer_name: String,
    pub phone: Phone,
    pub request: BookingRequest,
    pub created_at: DateTime<Utc>,
}
