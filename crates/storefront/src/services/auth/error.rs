//! Identity resolution error types.

use thiserror::Error;

use tandaro_core::{PhoneError, RepositoryError, Text};

use super::AuthMode;

/// Errors that can occur while resolving a phone number to a user.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Phone number failed normalization.
    #[error("invalid phone: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// Signup without a name.
    #[error("name is required")]
    MissingName,

    /// Login with a phone nobody registered.
    #[error("user not found")]
    UserNotFound,

    /// Signup with a phone somebody already registered.
    #[error("user already exists")]
    UserExists,

    /// Backend failure.
    #[error("backend error: {0}")]
    Failure(#[from] RepositoryError),
}

impl AuthError {
    /// Translated message shown above the form.
    #[must_use]
    pub const fn text(&self) -> Text {
        match self {
            Self::InvalidPhone(_) => Text::InvalidPhone,
            Self::MissingName => Text::MissingName,
            Self::UserNotFound => Text::UserNotFound,
            Self::UserExists => Text::UserExists,
            Self::Failure(_) => Text::AuthFailure,
        }
    }

    /// Form mode to show after this error.
    ///
    /// An unknown phone offers signup, a taken phone offers login, and
    /// everything else keeps the mode the user was in.
    #[must_use]
    pub const fn next_mode(&self, current: AuthMode) -> AuthMode {
        match self {
            Self::UserNotFound => AuthMode::Signup,
            Self::UserExists => AuthMode::Login,
            _ => current,
        }
    }

    /// Whether the error comes from the backend rather than user input.
    #[must_use]
    pub const fn is_backend(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}
