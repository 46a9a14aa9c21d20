//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page with gallery slideshow
//! GET  /gallery                       - Gallery slideshow (?slide=N)
//!
//! # Identity
//! GET  /auth                          - Login/signup page (?mode=login|signup)
//! POST /auth                          - Resolve phone to user
//! POST /auth/logout                   - Sign out
//!
//! # Bookings (requires auth)
//! GET  /book                          - Booking form
//! POST /book                          - Create booking
//! GET  /account                       - Profile and booking history
//!
//! # Preferences
//! POST /language                      - Set display language
//! POST /preferences/notification-sound - Toggle notification sounds
//! ```

pub mod account;
pub mod auth;
pub mod booking;
pub mod gallery;
pub mod home;
pub mod preferences;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/gallery", get(gallery::index))
        .route("/auth", get(auth::page).post(auth::submit))
        .route("/auth/logout", post(auth::logout))
        .route("/book", get(booking::form).post(booking::create))
        .route("/account", get(account::index))
        .route("/language", post(preferences::language))
        .route(
            "/preferences/notification-sound",
            post(preferences::toggle_notification_sound),
        )
}

/// Local path to send the visitor back to after a layout form.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_path_keeps_local_paths() {
        assert_eq!(return_path(Some("/gallery")), "/gallery");
        assert_eq!(return_path(Some("/account")), "/account");
    }

    #[test]
    fn return_path_rejects_offsite_targets() {
        assert_eq!(return_path(None), "/");
        assert_eq!(return_path(Some("https://evil.example")), "/");
        assert_eq!(return_path(Some("//evil.example")), "/");
        assert_eq!(return_path(Some("/\\evil.example")), "/");
    }

    #[test]
    fn return_path_rejects_control_characters() {
        assert_eq!(return_path(Some("/x\ny")), "/");
        assert_eq!(return_path(Some("/x\r\nSet-Cookie: a=b")), "/");
        assert_eq!(return_path(Some("/tab\there")), "/");
    }
}
