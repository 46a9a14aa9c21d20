//! Application state shared across admin handlers.

use std::sync::Arc;

use tandaro_core::{Backends, BookingLedger, GalleryCatalog, ObjectStorage, UserDirectory};

use crate::config::AdminConfig;
use crate::services::gallery::GalleryService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    backends: Backends,
    storage: Arc<dyn ObjectStorage>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig, backends: Backends, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                backends,
                storage,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// User directory backend.
    #[must_use]
    pub fn users(&self) -> &dyn UserDirectory {
        self.inner.backends.users.as_ref()
    }

    /// Booking ledger backend.
    #[must_use]
    pub fn bookings(&self) -> &dyn BookingLedger {
        self.inner.backends.bookings.as_ref()
    }

    /// Gallery catalog backend.
    #[must_use]
    pub fn gallery_catalog(&self) -> &dyn GalleryCatalog {
        self.inner.backends.gallery.as_ref()
    }

    /// Gallery service over the catalog and object storage.
    #[must_use]
    pub fn gallery(&self) -> GalleryService<'_> {
        GalleryService::new(
            self.inner.backends.gallery.as_ref(),
            self.inner.storage.as_ref(),
            &self.inner.config.gallery_prefix,
        )
    }
}
