//! Delivery booking status and request validation.

use core::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Maximum length of free-form booking notes, in characters.
pub const MAX_NOTES_CHARS: usize = 500;

/// Format of `<input type="datetime-local">` values.
const SCHEDULE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Errors raised while validating a booking request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Pickup or drop-off address is blank.
    #[error("pickup and drop-off addresses are required")]
    MissingAddress,
    /// Scheduled time is not `YYYY-MM-DDTHH:MM`.
    #[error("invalid scheduled time: {0}")]
    InvalidSchedule(String),
    /// Notes exceed [`MAX_NOTES_CHARS`].
    #[error("notes must be at most {max} characters")]
    NotesTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Status string is not a known [`BookingStatus`].
    #[error("unknown booking status: {0}")]
    UnknownStatus(String),
}

/// Lifecycle of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Submitted by the customer, not yet handled.
    Pending,
    /// Accepted by the business.
    Confirmed,
    /// Delivered.
    Completed,
    /// Called off by either side.
    Cancelled,
}

impl BookingStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Database and form representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse the database/form representation.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::UnknownStatus`] for unknown values.
    pub fn parse(s: &str) -> Result<Self, BookingError> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| BookingError::UnknownStatus(s.to_owned()))
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated booking request, before the backend assigns an ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Where the parcel is collected.
    pub pickup_address: String,
    /// Where the parcel is delivered.
    pub dropoff_address: String,
    /// Requested local pickup time.
    pub scheduled_for: NaiveDateTime,
    /// Free-form notes for the courier.
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Validate raw form input.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError`] describing the first invalid field.
    pub fn parse(
        pickup_address: &str,
        dropoff_address: &str,
        scheduled_for: &str,
        notes: &str,
    ) -> Result<Self, BookingError> {
        let pickup_address = pickup_address.trim();
        let dropoff_address = dropoff_address.trim();
        if pickup_address.is_empty() || dropoff_address.is_empty() {
            return Err(BookingError::MissingAddress);
        }

        let scheduled_for = NaiveDateTime::parse_from_str(scheduled_for.trim(), SCHEDULE_FORMAT)
            .map_err(|_| BookingError::InvalidSchedule(scheduled_for.to_owned()))?;

        let notes = notes.trim();
        if notes.chars().count() > MAX_NOTES_CHARS {
            return Err(BookingError::NotesTooLong {
                max: MAX_NOTES_CHARS,
            });
        }

        Ok(Self {
            pickup_address: pickup_address.to_owned(),
            dropoff_address: dropoff_address.to_owned(),
            scheduled_for,
            notes: (!notes.is_empty()).then(|| notes.to_owned()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_request() {
        let req = BookingRequest::parse(
            " Haifa port ",
            "Nazareth, Paulus VI 12",
            "2026-11-02T09:30",
            "  ",
        )
        .unwrap();
        assert_eq!(req.pickup_address, "Haifa port");
        assert_eq!(req.scheduled_for.to_string(), "2026-11-02 09:30:00");
        assert_eq!(req.notes, None);
    }

    #[test]
    fn rejects_blank_address() {
        assert_eq!(
            BookingRequest::parse("", "b", "2026-11-02T09:30", ""),
            Err(BookingError::MissingAddress)
        );
    }

    #[test]
    fn rejects_bad_schedule() {
        assert!(matches!(
            BookingRequest::parse("a", "b", "tomorrow", ""),
            Err(BookingError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn rejects_long_notes() {
        let notes = "x".repeat(MAX_NOTES_CHARS + 1);
        assert_eq!(
            BookingRequest::parse("a", "b", "2026-11-02T09:30", &notes),
            Err(BookingError::NotesTooLong { max: 500 })
        );
    }

    #[test]
    fn status_round_trip() {
        for status in BookingStatus::ALL {
            assert_eq!(BookingStatus::parse(status.as_str()), Ok(status));
        }
        assert!(BookingStatus::parse("lost").is_err());
    }
}
