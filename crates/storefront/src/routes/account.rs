//! Account page: profile and booking history.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use tandaro_core::{Booking, Text};

use crate::middleware::{Page, RequireAuth};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Query parameters for the account page.
#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub booked: Option<u8>,
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub page: Page,
    pub user: CurrentUser,
    pub bookings: Vec<Booking>,
    pub notice: Option<&'static str>,
    pub error: Option<&'static str>,
}

/// Display the account page.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: Page,
    Query(query): Query<AccountQuery>,
) -> impl IntoResponse {
    let (bookings, error) = match state.bookings().list_for_user(user.id).await {
        Ok(bookings) => (bookings, None),
        Err(e) => {
            tracing::error!(error = %e, user_id = %user.id, "Failed to load bookings");
            (Vec::new(), Some(page.i18n.t(Text::LoadFailure)))
        }
    };
    let notice = query
        .booked
        .is_some()
        .then(|| page.i18n.t(Text::BookingCreated));

    AccountTemplate {
        page,
        user,
        bookings,
        notice,
        error,
    }
}
