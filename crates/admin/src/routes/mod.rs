//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Redirect to the gallery
//!
//! # Auth (phone number of a user with the administrator flag)
//! GET  /auth/login                - Login page
//! POST /auth/login                - Sign in
//! POST /auth/logout               - Sign out
//!
//! # Gallery
//! GET  /gallery                   - Records and upload form
//! POST /gallery/upload            - Upload a batch (multipart, repeated `files`)
//! POST /gallery/{id}/delete       - Delete a record (`delete_object=on` removes the file too)
//!
//! # Bookings
//! GET  /bookings                  - All bookings
//! POST /bookings/{id}/status      - Change a booking's status
//!
//! # Users
//! GET  /users                     - All users
//!
//! # Preferences
//! POST /language                  - Set display language
//! ```

pub mod auth;
pub mod bookings;
pub mod gallery;
pub mod preferences;
pub mod users;

use axum::{Router, response::Redirect, routing::get};

use crate::state::AppState;

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/gallery") }))
        .merge(auth::router())
        .merge(gallery::router())
        .merge(bookings::router())
        .merge(users::router())
        .merge(preferences::router())
}

/// Local path to send the admin back to after a layout form.
///
/// Anything that is not a plain same-origin path falls back to `/`.
/// Control characters are refused since they cannot go in a `Location` header.
pub(crate) fn return_path(raw: Option<&str>) -> &str {
    match raw {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => "/",
    }
}
