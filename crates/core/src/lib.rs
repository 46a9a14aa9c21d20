//! Tandaro Core - Shared domain library.
//!
//! This crate provides the pieces shared by every Tandaro component:
//! - `storefront` - Customer site (booking, gallery, phone sign-in)
//! - `admin` - Administration panel (gallery uploads, bookings, users)
//! - `cli` - Command-line tools for migrations and maintenance
//!
//! # Architecture
//!
//! Types, validation and backend traits carry no HTTP concerns. Database
//! access is opt-in through the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Validated newtypes: IDs, phones, languages, media keys, bookings
//! - [`models`] - Records stored by the backends
//! - [`backend`] - Document-store and object-store traits, in-memory backends
//! - [`i18n`] - Arabic, Hebrew and English interface text
//! - [`slideshow`] - Gallery rotation state
//! - [`contact`] - WhatsApp links
//! - `db` - `PostgreSQL` repositories (feature `postgres`)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod contact;
#[cfg(feature = "postgres")]
pub mod db;
pub mod i18n;
pub mod models;
pub mod slideshow;
pub mod types;

pub use backend::{
    Backends, BookingLedger, GalleryCatalog, ObjectMetadata, ObjectStorage, RepositoryError,
    StorageError, StoredObject, UserDirectory,
};
pub use i18n::{I18n, Text};
pub use models::{Booking, GalleryImage, NewBooking, NewGalleryImage, NewUser, User};
pub use slideshow::{SLIDE_INTERVAL, Slideshow};
pub use types::*;
