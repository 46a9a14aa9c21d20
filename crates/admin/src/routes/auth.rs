//! Authentication route handlers for admin.
//!
//! Provides the phone login page and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tandaro_core::Text;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{AdminPage, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::{AdminAuthError, resolve_admin};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub phone: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub page: AdminPage,
    pub phone: String,
    pub error: Option<&'static str>,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(page: AdminPage) -> impl IntoResponse {
    LoginTemplate {
        page,
        phone: String::new(),
        error: None,
    }
}

/// Sign in with an administrator's phone.
///
/// POST /auth/login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    page: AdminPage,
    Form(form): Form<LoginForm>,
) -> Response {
    let admin = match resolve_admin(state.users(), &form.phone).await {
        Ok(user) => CurrentAdmin::from(user),
        Err(e) => return render_error(page, form.phone, &e),
    };

    if let Err(e) = set_current_admin(&session, &admin).await {
        tracing::error!(error = %e, "Failed to store admin in session");
        let template = LoginTemplate {
            error: Some(page.i18n.t(Text::AuthFailure)),
            phone: form.phone,
            page,
        };
        return (StatusCode::SERVICE_UNAVAILABLE, template).into_response();
    }

    set_sentry_user(&admin.id);
    tracing::info!(admin_id = %admin.id, "Admin signed in");
    Redirect::to("/gallery").into_response()
}

fn render_error(page: AdminPage, phone: String, err: &AdminAuthError) -> Response {
    let status = match err {
        AdminAuthError::InvalidPhone(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AdminAuthError::UserNotFound | AdminAuthError::Forbidden => StatusCode::FORBIDDEN,
        AdminAuthError::Failure(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    if status == StatusCode::SERVICE_UNAVAILABLE {
        tracing::error!(error = %err, "Admin sign-in failed");
    } else {
        tracing::warn!(error = %err, "Admin sign-in refused");
    }

    let template = LoginTemplate {
        error: Some(page.i18n.t(err.text())),
        phone,
        page,
    };
    (status, template).into_response()
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!(error = %e, "Failed to clear admin session");
    }
    clear_sentry_user();
    Redirect::to("/auth/login")
}
