//! Booking route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use tandaro_core::{BookingRequest, NewBooking, Text};

use crate::middleware::{Page, RequireAuth};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Booking form data.
#[derive(Debug, Default, Deserialize)]
pub struct BookingForm {
    #[serde(default)]
    pub pickup_address: String,
    #[serde(default)]
    pub dropoff_address: String,
    #[serde(default)]
    pub scheduled_for: String,
    #[serde(default)]
    pub notes: String,
}

/// Booking form template.
#[derive(Template, WebTemplate)]
#[template(path = "book.html")]
pub struct BookTemplate {
    pub page: Page,
    pub user: CurrentUser,
    pub form: BookingForm,
    pub error: Option<&'static str>,
}

/// Display the booking form.
pub async fn form(RequireAuth(user): RequireAuth, page: Page) -> impl IntoResponse {
    BookTemplate {
        page,
        user,
        form: BookingForm::default(),
        error: None,
    }
}

/// Handle booking form submission.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: Page,
    Form(form): Form<BookingForm>,
) -> Response {
    let request = match BookingRequest::parse(
        &form.pickup_address,
        &form.dropoff_address,
        &form.scheduled_for,
        &form.notes,
    ) {
        Ok(request) => request,
        Err(e) => {
            tracing::info!(error = %e, "Booking rejected");
            let error = Some(page.i18n.t(Text::from(&e)));
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                BookTemplate {
                    page,
                    user,
                    form,
                    error,
                },
            )
                .into_response();
        }
    };

    let new_booking = NewBooking {
        user_id: user.id,
        customer_name: user.name.clone(),
        phone: user.phone.clone(),
        request,
        created_at: Utc::now(),
    };

    match state.bookings().create(new_booking).await {
        Ok(booking) => {
            tracing::info!(booking_id = %booking.id, "Booking created");
            Redirect::to("/account?booked=1").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create booking");
            let error = Some(page.i18n.t(Text::BookingFailure));
            (
                StatusCode::SERVICE_UNAVAILABLE,
                BookTemplate {
                    page,
                    user,
                    form,
                    error,
                },
            )
                .into_response()
        }
    }
}
