//! User listing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};

use tandaro_core::{Text, User};

use crate::error::Result;
use crate::middleware::{AdminPage, RequireAdminAuth};
use crate::state::AppState;

/// Users page template.
#[derive(Template, WebTemplate)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub page: AdminPage,
    pub users: Vec<User>,
}

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new().route("/users", get(index))
}

/// List every registered user.
///
/// GET /users
async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    page: AdminPage,
) -> Result<UsersTemplate> {
    let users = state.users().list().await?;
    Ok(UsersTemplate { page, users })
}
