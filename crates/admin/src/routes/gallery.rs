//! Gallery administration: listing, batch upload, deletion.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use tandaro_core::{GalleryImage, GalleryImageId, MAX_IMAGE_BYTES, RepositoryError, Text};

use crate::error::{AppError, Result};
use crate::middleware::{AdminPage, RequireAdminAuth};
use crate::services::gallery::{BatchReport, DeleteMode, UploadFile};
use crate::state::AppState;

/// Multipart field carrying the files.
const FILES_FIELD: &str = "files";

/// Request body cap for one upload batch.
///
/// Individual files are still held to [`MAX_IMAGE_BYTES`]; this only bounds
/// how much one request can buffer.
const UPLOAD_BODY_LIMIT: usize = 64 * 1024 * 1024;

/// Query parameters for the gallery page.
#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub deleted: Option<u8>,
    pub missing: Option<u8>,
}

/// Delete form data. An unchecked checkbox is simply absent.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub delete_object: Option<String>,
}

/// One failed file, ready for display.
#[derive(Debug)]
pub struct FailureView {
    pub file_name: String,
    pub message: &'static str,
}

/// Aggregate upload result shown above the gallery.
#[derive(Debug)]
pub struct BatchView {
    pub uploaded: usize,
    pub failed: usize,
    pub failures: Vec<FailureView>,
}

impl BatchView {
    fn new(report: &BatchReport, page: &AdminPage) -> Self {
        Self {
            uploaded: report.succeeded.len(),
            failed: report.failed.len(),
            failures: report
                .failed
                .iter()
                .map(|f| FailureView {
                    file_name: f.file_name.clone(),
                    message: page.i18n.t(Text::from(&f.error)),
                })
                .collect(),
        }
    }
}

/// Gallery page template.
#[derive(Template, WebTemplate)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate {
    pub page: AdminPage,
    pub images: Vec<GalleryImage>,
    pub batch: Option<BatchView>,
    pub notice: Option<&'static str>,
    pub error: Option<&'static str>,
    pub max_mib: u64,
}

/// Build the gallery router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/gallery", get(index))
        .route(
            "/gallery/upload",
            post(upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/gallery/{id}/delete", post(delete))
}

async fn render(
    state: &AppState,
    page: AdminPage,
    batch: Option<BatchView>,
    notice: Option<&'static str>,
) -> GalleryTemplate {
    let (images, error) = match state.gallery().list().await {
        Ok(images) => (images, None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load gallery");
            (Vec::new(), Some(page.i18n.t(Text::LoadFailure)))
        }
    };

    GalleryTemplate {
        page,
        images,
        batch,
        notice,
        error,
        max_mib: MAX_IMAGE_BYTES / (1024 * 1024),
    }
}

/// Gallery records and the upload form.
///
/// GET /gallery
async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    page: AdminPage,
    Query(query): Query<GalleryQuery>,
) -> impl IntoResponse {
    let notice = if query.deleted.is_some() {
        Some(page.i18n.t(Text::ImageDeleted))
    } else if query.missing.is_some() {
        Some(page.i18n.t(Text::ImageNotFound))
    } else {
        None
    };
    render(&state, page, None, notice).await
}

/// Upload a batch of images.
///
/// POST /gallery/upload
///
/// Renders the gallery directly with the batch report.
#[instrument(skip_all)]
async fn upload(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    page: AdminPage,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        // Browsers send an empty part when no file was chosen.
        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }
        files.push(UploadFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let report = state
        .gallery()
        .upload_batch(files, &admin.uploader_tag(), page.language())
        .await;
    tracing::info!(
        admin_id = %admin.id,
        uploaded = report.succeeded.len(),
        failed = report.failed.len(),
        "Upload batch finished"
    );

    let batch = BatchView::new(&report, &page);
    Ok(render(&state, page, Some(batch), None).await.into_response())
}

/// Delete a gallery record.
///
/// POST /gallery/{id}/delete
#[instrument(skip_all)]
async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<GalleryImageId>,
    Form(form): Form<DeleteForm>,
) -> Result<Response> {
    let mode = DeleteMode::from_checkbox(form.delete_object.as_deref() == Some("on"));

    match state.gallery().delete(id, mode).await {
        Ok(deleted) => {
            tracing::info!(admin_id = %admin.id, image_id = %deleted.image.id, "Admin deleted image");
            Ok(Redirect::to("/gallery?deleted=1").into_response())
        }
        Err(RepositoryError::NotFound) => Ok(Redirect::to("/gallery?missing=1").into_response()),
        Err(e) => Err(AppError::Repository(e)),
    }
}

#[cfg(test)]
mod tests {
    use tandaro_core::{Language, UploadError};

    use super::*;
    use crate::services::gallery::FailedUpload;

    #[test]
    fn batch_view_translates_failures() {
        let report = BatchReport {
            succeeded: Vec::new(),
            failed: vec![FailedUpload {
                file_name: "notes.txt".to_string(),
                error: UploadError::InvalidFileType {
                    file_name: "notes.txt".to_string(),
                },
            }],
        };
        let page = AdminPage {
            i18n: tandaro_core::I18n::new(Language::English),
            admin: None,
            path: "/gallery/upload".to_string(),
        };

        let view = BatchView::new(&report, &page);
        assert_eq!(view.uploaded, 0);
        assert_eq!(view.failed, 1);
        assert_eq!(view.failures[0].file_name, "notes.txt");
        assert_eq!(view.failures[0].message, "File is not an image");
    }
}
