//! `PostgreSQL` repositories.
//!
//! # Tables
//!
//! - `users` - customers and administrators (`UNIQUE (phone)`)
//! - `gallery_images` - gallery records
//! - `bookings` - delivery requests
//! - `tower_sessions.session` - session store, created by `PostgresStore::migrate`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/core/migrations/` and run via:
//! ```bash
//! cargo run -p tandaro-cli -- migrate
//! ```

pub mod bookings;
pub mod gallery;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use bookings::PgBookingLedger;
pub use gallery::PgGalleryCatalog;
pub use users::PgUserDirectory;

use crate::backend::RepositoryError;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a stored value that fails domain validation.
fn corrupt(what: &str, err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::DataCorruption(format!("invalid {what} in database: {err}"))
}
