//! Gallery image repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::backend::{GalleryCatalog, RepositoryError};
use crate::models::{GalleryImage, NewGalleryImage};
use crate::types::{GalleryImageId, StorageKey};

#[derive(sqlx::FromRow)]
struct GalleryImageRow {
    id: GalleryImageId,
    url: String,
    title: String,
    description: String,
    file_name: String,
    uploaded_by: String,
    storage_key: String,
    created_at: DateTime<Utc>,
}

impl From<GalleryImageRow> for GalleryImage {
    fn from(row: GalleryImageRow) -> Self {
        Self {
            id: row.id,
            url: row.url,
            title: row.title,
            description: row.description,
            file_name: row.file_name,
            uploaded_by: row.uploaded_by,
            storage_key: StorageKey::from_stored(row.storage_key),
            created_at: row.created_at,
        }
    }
}

/// Gallery records stored in `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgGalleryCatalog {
    pool: PgPool,
}

impl PgGalleryCatalog {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GalleryCatalog for PgGalleryCatalog {
    async fn list(&self) -> Result<Vec<GalleryImage>, RepositoryError> {
        let rows = sqlx::query_as::<_, GalleryImageRow>(
            r"
            SELECT id, url, title, description, file_name, uploaded_by, storage_key, created_at
            FROM gallery_images
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(GalleryImage::from).collect())
    }

    async fn create(&self, image: NewGalleryImage) -> Result<GalleryImage, RepositoryError> {
        let row = sqlx::query_as::<_, GalleryImageRow>(
            r"
            INSERT INTO gallery_images
                (url, title, description, file_name, uploaded_by, storage_key, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, url, title, description, file_name, uploaded_by, storage_key, created_at
            ",
        )
        .bind(&image.url)
        .bind(&image.title)
        .bind(&image.description)
        .bind(&image.file_name)
        .bind(&image.uploaded_by)
        .bind(image.storage_key.as_str())
        .bind(image.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, id: GalleryImageId) -> Result<GalleryImage, RepositoryError> {
        let row = sqlx::query_as::<_, GalleryImageRow>(
            r"
            DELETE FROM gallery_images
            WHERE id = $1
            RETURNING id, url, title, description, file_name, uploaded_by, storage_key, created_at
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
