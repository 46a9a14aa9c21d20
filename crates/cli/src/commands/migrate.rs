//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! tandaro-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! Schema migrations live in `crates/core/migrations/`. The session table is
//! created by `tower-sessions-sqlx-store` itself.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CliError, connect};

/// Run schema migrations, then create the session table.
///
/// # Errors
///
/// Returns `CliError` if the connection or any migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running schema migrations...");
    sqlx::migrate!("../core/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool)
        .migrate()
        .await
        .map_err(|e| CliError::SessionStore(e.to_string()))?;

    tracing::info!("Migrations complete!");
    Ok(())
}
