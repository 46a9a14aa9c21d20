//! Application state shared across handlers.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use tandaro_core::{
    Backends, BookingLedger, GalleryCatalog, GalleryImage, GalleryImageId, Slideshow,
    UserDirectory,
};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backends and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backends: Backends,
    slideshow: Mutex<OnAir>,
}

/// The slideshow every visitor joins, and the image set it was built for.
struct OnAir {
    images: Vec<GalleryImageId>,
    show: Slideshow,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, backends: Backends) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                backends,
                slideshow: Mutex::new(OnAir {
                    images: Vec::new(),
                    show: Slideshow::new(0, Instant::now()),
                }),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// User directory backend.
    #[must_use]
    pub fn users(&self) -> &dyn UserDirectory {
        self.inner.backends.users.as_ref()
    }

    /// Gallery catalog backend.
    #[must_use]
    pub fn gallery(&self) -> &dyn GalleryCatalog {
        self.inner.backends.gallery.as_ref()
    }

    /// Booking ledger backend.
    #[must_use]
    pub fn bookings(&self) -> &dyn BookingLedger {
        self.inner.backends.bookings.as_ref()
    }

    /// Advance the shared slideshow to `now` and return a snapshot of it.
    ///
    /// A different image set than last time restarts it from the first image.
    pub fn slideshow(&self, images: &[GalleryImage], now: Instant) -> Slideshow {
        let mut on_air = self
            .inner
            .slideshow
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let ids: Vec<GalleryImageId> = images.iter().map(|image| image.id).collect();
        if on_air.images != ids {
            on_air.show.replace_images(ids.len(), now);
            on_air.images = ids;
        }
        on_air.show.poll(now);
        on_air.show
    }
}
