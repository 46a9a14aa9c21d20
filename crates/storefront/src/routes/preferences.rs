//! Layout preference handlers: language and notification sounds.

use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use tandaro_core::Language;

use super::return_path;
use crate::error::{AppError, Result};
use crate::middleware::page::notification_sound;
use crate::middleware::{set_language, set_notification_sound};

/// Language picker form data.
#[derive(Debug, Deserialize)]
pub struct LanguageForm {
    pub lang: String,
    pub return_to: Option<String>,
}

/// Notification toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub return_to: Option<String>,
}

/// Store the chosen language and go back.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for unsupported codes.
pub async fn language(session: Session, Form(form): Form<LanguageForm>) -> Result<Response> {
    let language =
        Language::parse(&form.lang).map_err(|e| AppError::BadRequest(e.to_string()))?;
    set_language(&session, language).await?;
    Ok(Redirect::to(return_path(form.return_to.as_deref())).into_response())
}

/// Flip the notification-sound preference and go back.
///
/// # Errors
///
/// Returns `AppError::Session` if the session cannot be written.
pub async fn toggle_notification_sound(
    session: Session,
    Form(form): Form<ToggleForm>,
) -> Result<Response> {
    let enabled = !notification_sound(&session).await;
    set_notification_sound(&session, enabled).await?;
    tracing::debug!(enabled, "Notification sound preference changed");
    Ok(Redirect::to(return_path(form.return_to.as_deref())).into_response())
}
