//! Gallery slideshow route handler.
//!
//! All visitors share one slideshow clock, so a page load shows whichever
//! image is on air. The server renders every slide with that one visible,
//! plus previous/next/dot links that work without JavaScript.
//! `static/app.js` keeps rotating every [`SLIDE_INTERVAL`] from there.

use std::time::Instant;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use tandaro_core::{GalleryImage, SLIDE_INTERVAL, Slideshow, Text};

use crate::middleware::Page;
use crate::state::AppState;

/// Query parameters for the gallery page.
#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub slide: Option<usize>,
}

/// Slides plus the navigation indices around the visible one.
#[derive(Debug, Clone)]
pub struct SlideshowView {
    pub images: Vec<GalleryImage>,
    pub current: usize,
    pub prev: usize,
    pub next: usize,
    pub rotating: bool,
    pub interval_ms: u128,
}

impl SlideshowView {
    /// Build the view from a slideshow snapshot. A `requested` index in
    /// range overrides the snapshot's position.
    #[must_use]
    pub fn new(images: Vec<GalleryImage>, mut show: Slideshow, requested: Option<usize>) -> Self {
        if let Some(index) = requested {
            show.select(index);
        }
        let mut prev = show;
        prev.prev();
        let mut next = show;
        next.next();

        Self {
            images,
            current: show.index(),
            prev: prev.index(),
            next: next.index(),
            rotating: show.is_rotating(),
            interval_ms: SLIDE_INTERVAL.as_millis(),
        }
    }

    /// Whether `index` is the visible slide.
    #[must_use]
    pub const fn is_current(&self, index: &usize) -> bool {
        *index == self.current
    }
}

/// Gallery page template.
#[derive(Template, WebTemplate)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate {
    pub page: Page,
    pub slideshow: SlideshowView,
    pub notice: Option<&'static str>,
}

/// Display the gallery.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: Page,
    Query(query): Query<GalleryQuery>,
) -> impl IntoResponse {
    let (slideshow, notice) = match state.gallery().list().await {
        Ok(images) => {
            let show = state.slideshow(&images, Instant::now());
            (SlideshowView::new(images, show, query.slide), None)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load gallery");
            (
                SlideshowView::new(Vec::new(), Slideshow::new(0, Instant::now()), None),
                Some(page.i18n.t(Text::LoadFailure)),
            )
        }
    };

    GalleryTemplate {
        page,
        slideshow,
        notice,
    }
}
