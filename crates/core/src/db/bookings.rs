//! Booking repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::PgPool;

use super::corrupt;
use crate::backend::{BookingLedger, RepositoryError};
use crate::models::{Booking, NewBooking};
use crate::types::{BookingId, BookingStatus, Phone, UserId};

const COLUMNS: &str = "id, user_id, customer_name, phone, pickup_address, dropoff_address, \
                       scheduled_for, notes, status, created_at";

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: BookingId,
    user_id: UserId,
    customer_name: String,
    phone: String,
    pickup_address: String,
    dropoff_address: String,
    scheduled_for: NaiveDateTime,
    notes: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = RepositoryError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            customer_name: row.customer_name,
            phone: Phone::parse(&row.phone).map_err(|e| corrupt("phone", e))?,
            pickup_address: row.pickup_address,
            dropoff_address: row.dropoff_address,
            scheduled_for: row.scheduled_for,
            notes: row.notes,
            status: BookingStatus::parse(&row.status).map_err(|e| corrupt("status", e))?,
            created_at: row.created_at,
        })
    }
}

/// Bookings stored in `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgBookingLedger {
    pool: PgPool,
}

impl PgBookingLedger {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingLedger for PgBookingLedger {
    async fn create(&self, booking: NewBooking) -> Result<Booking, RepositoryError> {
        let sql = format!(
            "INSERT INTO bookings (user_id, customer_name, phone, pickup_address, \
             dropoff_address, scheduled_for, notes, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(booking.user_id)
            .bind(&booking.customer_name)
            .bind(booking.phone.as_str())
            .bind(&booking.request.pickup_address)
            .bind(&booking.request.dropoff_address)
            .bind(booking.request.scheduled_for)
            .bind(booking.request.notes.as_deref())
            .bind(booking.created_at)
            .fetch_one(&self.pool)
            .await?;

        Booking::try_from(row)
    }

    async fn list(&self) -> Result<Vec<Booking>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM bookings ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Booking>, RepositoryError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn set_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<Booking, RepositoryError> {
        let sql = format!("UPDATE bookings SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Booking::try_from(row)
    }
}
