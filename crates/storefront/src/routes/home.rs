//! Home page route handler.

use std::time::Instant;

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use tandaro_core::{Slideshow, Text};

use super::gallery::SlideshowView;
use crate::middleware::Page;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: Page,
    pub slideshow: SlideshowView,
    pub notice: Option<&'static str>,
}

/// Display the home page.
///
/// A gallery backend failure still renders the page, without slides.
#[instrument(skip(state, page))]
pub async fn index(State(state): State<AppState>, page: Page) -> impl IntoResponse {
    let (slideshow, notice) = match state.gallery().list().await {
        Ok(images) => {
            let show = Slideshow::new(images.len(), Instant::now());
            (SlideshowView::new(images, show, None), None)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load gallery for home page");
            (
                SlideshowView::new(Vec::new(), Slideshow::new(0, Instant::now()), None),
                Some(page.i18n.t(Text::LoadFailure)),
            )
        }
    };

    HomeTemplate {
        page,
        slideshow,
        notice,
    }
}
