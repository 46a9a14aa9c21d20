//! Booking administration.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use tandaro_core::{Booking, BookingId, BookingStatus, RepositoryError, Text};

use crate::error::{AppError, Result};
use crate::middleware::{AdminPage, RequireAdminAuth};
use crate::state::AppState;

/// Query parameters for the bookings page.
#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    pub updated: Option<i64>,
}

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Bookings page template.
#[derive(Template, WebTemplate)]
#[template(path = "bookings.html")]
pub struct BookingsTemplate {
    pub page: AdminPage,
    pub bookings: Vec<Booking>,
    pub statuses: [BookingStatus; 4],
    pub updated: Option<i64>,
}

impl BookingsTemplate {
    /// Whether `booking` was the one just changed.
    #[must_use]
    pub fn is_updated(&self, booking: &Booking) -> bool {
        self.updated == Some(booking.id.as_i64())
    }

    /// Whether `booking` currently has `status`, for the select box.
    #[must_use]
    pub fn has_status(&self, booking: &Booking, status: &BookingStatus) -> bool {
        booking.status == *status
    }

    /// Translated status name.
    #[must_use]
    pub fn status_label(&self, status: &BookingStatus) -> &'static str {
        self.page.i18n.status(status)
    }
}

/// Build the bookings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(index))
        .route("/bookings/{id}/status", post(set_status))
}

/// List all bookings, newest first.
///
/// GET /bookings
async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    page: AdminPage,
    Query(query): Query<BookingsQuery>,
) -> Result<BookingsTemplate> {
    let bookings = state.bookings().list().await?;
    Ok(BookingsTemplate {
        page,
        bookings,
        statuses: BookingStatus::ALL,
        updated: query.updated,
    })
}

/// Move a booking to a new status.
///
/// POST /bookings/{id}/status
#[instrument(skip_all)]
async fn set_status(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<BookingId>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    let status =
        BookingStatus::parse(&form.status).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let booking = state
        .bookings()
        .set_status(id, status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("booking {id}")),
            other => AppError::Repository(other),
        })?;

    tracing::info!(admin_id = %admin.id, booking_id = %booking.id, status = %booking.status, "Booking status changed");
    Ok(Redirect::to(&format!("/bookings?updated={}", booking.id)).into_response())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use tandaro_core::{I18n, Language, Phone, UserId};

    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn renders_translated_statuses_with_current_selected() {
        let booking = Booking {
            id: BookingId::new(7),
            user_id: UserId::new(1),
            customer_name: "Rana".to_owned(),
            phone: Phone::parse("0501234567").unwrap(),
            pickup_address: "Haifa port".to_owned(),
            dropoff_address: "Nazareth".to_owned(),
            scheduled_for: NaiveDate::from_ymd_opt(2030, 5, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            notes: None,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        };
        let html = BookingsTemplate {
            page: AdminPage {
                i18n: I18n::new(Language::English),
                admin: None,
                path: "/bookings".to_owned(),
            },
            bookings: vec![booking],
            statuses: BookingStatus::ALL,
            updated: Some(7),
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"<option value="confirmed" selected>Confirmed</option>"#));
        assert!(html.contains(r#"<option value="cancelled">Cancelled</option>"#));
        assert!(html.contains(r#"data-booking="7" class="updated""#));
    }
}
