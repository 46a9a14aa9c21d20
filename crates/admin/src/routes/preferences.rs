//! Admin display language.

use axum::{
    Form, Router,
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use serde::Deserialize;
use tower_sessions::Session;

use tandaro_core::Language;

use super::return_path;
use crate::error::{AppError, Result};
use crate::middleware::set_language;
use crate::state::AppState;

/// Language picker form data.
#[derive(Debug, Deserialize)]
pub struct LanguageForm {
    pub lang: String,
    pub return_to: Option<String>,
}

/// Build the preferences router.
pub fn router() -> Router<AppState> {
    Router::new().route("/language", post(language))
}

/// Store the chosen language and go back.
///
/// POST /language
async fn language(session: Session, Form(form): Form<LanguageForm>) -> Result<Response> {
    let language =
        Language::parse(&form.lang).map_err(|e| AppError::BadRequest(e.to_string()))?;
    set_language(&session, language).await?;
    Ok(Redirect::to(return_path(form.return_to.as_deref())).into_response())
}
