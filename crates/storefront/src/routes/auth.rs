//! Identity route handlers.
//!
//! One page serves both login and signup. A failed submission re-renders the
//! page with a translated notice; the mode flips when the error suggests the
//! other branch (unknown phone offers signup, taken phone offers login).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tandaro_core::{RepositoryError, Text};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{Page, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthMode, IdentityService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Query parameters for the auth page.
#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    pub mode: Option<AuthMode>,
}

/// Login/signup form data.
#[derive(Debug, Deserialize)]
pub struct AuthForm {
    #[serde(default)]
    pub mode: AuthMode,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login/signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth.html")]
pub struct AuthTemplate {
    pub page: Page,
    pub mode: AuthMode,
    pub name: String,
    pub phone: String,
    pub error: Option<&'static str>,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the login/signup page.
pub async fn page(page: Page, Query(query): Query<AuthQuery>) -> impl IntoResponse {
    AuthTemplate {
        page,
        mode: query.mode.unwrap_or_default(),
        name: String::new(),
        phone: String::new(),
        error: None,
    }
}

/// Handle login/signup form submission.
///
/// Success stores the user in the session and redirects home with
/// `303 See Other`.
#[instrument(skip(state, session, page, form), fields(mode = form.mode.as_str()))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    page: Page,
    Form(form): Form<AuthForm>,
) -> Response {
    let service = IdentityService::new(state.users());

    let user = match service.resolve(form.mode, &form.name, &form.phone).await {
        Ok(user) => user,
        Err(e) => return render_error(page, form, &e),
    };

    let current = CurrentUser::from(user);
    if let Err(e) = set_current_user(&session, &current).await {
        tracing::error!(error = %e, "Failed to store user in session");
        let err = AuthError::Failure(RepositoryError::Backend(e.to_string()));
        return render_error(page, form, &err);
    }

    set_sentry_user(&current.id);
    tracing::info!(user_id = %current.id, "User signed in");
    Redirect::to("/").into_response()
}

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "Failed to clear session on logout");
    }
    clear_sentry_user();
    Redirect::to("/").into_response()
}

fn render_error(page: Page, form: AuthForm, err: &AuthError) -> Response {
    let status = match err {
        AuthError::InvalidPhone(_) | AuthError::MissingName => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::UserNotFound | AuthError::UserExists => StatusCode::OK,
        AuthError::Failure(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    if err.is_backend() {
        tracing::error!(error = %err, "Identity resolution failed");
    } else {
        tracing::info!(error = %err, "Identity resolution rejected");
    }

    let error = Some(page.i18n.t(err.text()));
    let template = AuthTemplate {
        mode: err.next_mode(form.mode),
        name: form.name,
        phone: form.phone,
        error,
        page,
    };
    (status, template).into_response()
}
