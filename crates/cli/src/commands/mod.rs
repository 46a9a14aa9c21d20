//! CLI command implementations.

pub mod admin;
pub mod gallery;
pub mod migrate;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use tandaro_admin::config::ConfigError;
use tandaro_admin::services::gallery::GalleryError;
use tandaro_core::{PhoneError, RepositoryError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Environment variable has an unusable value.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Session table migration failed.
    #[error("Session store migration error: {0}")]
    SessionStore(String),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Phone argument is not a valid number.
    #[error("Invalid phone: {0}")]
    Phone(#[from] PhoneError),

    /// Gallery maintenance failed.
    #[error(transparent)]
    Gallery(#[from] GalleryError),
}

/// Connect using `ADMIN_DATABASE_URL`, falling back to `DATABASE_URL`.
async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CliError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = tandaro_core::db::create_pool(&SecretString::from(database_url)).await?;
    Ok(pool)
}
