//! HTTP middleware for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. `TraceLayer`
//! 3. Session layer (SameSite=Strict)

pub mod auth;
pub mod page;
pub mod session;

pub use auth::{RequireAdminAuth, clear_current_admin, set_current_admin};
pub use page::{AdminPage, set_language};
pub use session::create_session_layer;
