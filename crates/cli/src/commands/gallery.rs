//! Gallery storage reconciliation.
//!
//! # Usage
//!
//! ```bash
//! # List stored images that no gallery record points at
//! tandaro-cli gallery orphans
//!
//! # Delete them
//! tandaro-cli gallery orphans --purge
//! ```
//!
//! Images uploaded within the last hour are left out; their records may
//! still be on the way.
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `MEDIA_DIR` - Directory images are stored in (default: media)
//! - `GALLERY_PREFIX` - Storage key prefix (default: gallery)

use tandaro_admin::config::parse_gallery_prefix;
use tandaro_admin::services::gallery::GalleryService;
use tandaro_admin::storage::LocalObjectStorage;
use tandaro_core::db::PgGalleryCatalog;

use super::{CliError, connect};

/// Report orphaned objects, deleting them when `purge` is set.
///
/// # Errors
///
/// Returns `CliError` if configuration, the database or the media
/// directory cannot be read.
#[allow(clippy::print_stdout)]
pub async fn orphans(purge: bool) -> Result<(), CliError> {
    let pool = connect().await?;
    let media_dir = std::env::var("MEDIA_DIR").unwrap_or_else(|_| "media".to_string());
    let prefix = parse_gallery_prefix(
        &std::env::var("GALLERY_PREFIX").unwrap_or_else(|_| "gallery".to_string()),
    )?;
    let public_url = std::env::var("MEDIA_PUBLIC_URL").unwrap_or_default();

    let catalog = PgGalleryCatalog::new(pool);
    let storage = LocalObjectStorage::new(media_dir, public_url);
    let service = GalleryService::new(&catalog, &storage, &prefix);

    if !purge {
        let orphans = service.find_orphans().await?;
        for key in &orphans {
            println!("{key}");
        }
        tracing::info!(count = orphans.len(), "Orphaned objects found");
        return Ok(());
    }

    let report = service.purge_orphans().await?;
    for key in &report.removed {
        println!("removed {key}");
    }
    for (key, error) in &report.failed {
        tracing::error!(key = %key, error = %error, "Failed to remove orphan");
    }
    tracing::info!(
        removed = report.removed.len(),
        failed = report.failed.len(),
        "Orphan purge complete"
    );
    Ok(())
}
