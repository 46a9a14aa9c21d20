//! Core types for Tandaro.
//!
//! This module provides validated wrappers for the domain concepts shared by
//! the storefront and the admin panel.

pub mod booking;
pub mod id;
pub mod language;
pub mod media;
pub mod phone;

pub use booking::{BookingError, BookingRequest, BookingStatus};
pub use id::*;
pub use language::{Language, UnknownLanguage};
pub use media::{MAX_IMAGE_BYTES, StorageKey, UploadError, sanitize_file_name, validate_image};
pub use phone::{COUNTRY_CODE, Phone, PhoneError};
