//! Identity resolution.
//!
//! Resolves a phone number to a user record: login looks the user up, signup
//! creates one. Input validation happens before any backend call.

mod error;

pub use error::AuthError;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use tandaro_core::{NewUser, Phone, RepositoryError, User, UserDirectory};

/// Which branch of the identity flow the form is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    /// Form and query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
        }
    }

    /// The other mode, for the switch link.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Signup,
            Self::Signup => Self::Login,
        }
    }

    /// Whether this is the signup branch.
    #[must_use]
    pub const fn is_signup(self) -> bool {
        matches!(self, Self::Signup)
    }
}

/// Identity resolution service.
pub struct IdentityService<'a> {
    users: &'a dyn UserDirectory,
}

impl<'a> IdentityService<'a> {
    /// Create a new identity service.
    #[must_use]
    pub const fn new(users: &'a dyn UserDirectory) -> Self {
        Self { users }
    }

    /// Resolve a submitted form to a user.
    ///
    /// The phone is validated first, then (signup only) the name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidPhone` or `AuthError::MissingName` for bad
    /// input, `AuthError::UserNotFound` when logging in with an unknown phone,
    /// `AuthError::UserExists` when signing up with a registered phone, and
    /// `AuthError::Failure` when the backend fails.
    pub async fn resolve(&self, mode: AuthMode, name: &str, phone: &str) -> Result<User, AuthError> {
        let phone = Phone::parse(phone)?;

        match mode {
            AuthMode::Login => self.login(&phone).await,
            AuthMode::Signup => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(AuthError::MissingName);
                }
                self.signup(name, phone).await
            }
        }
    }

    async fn login(&self, phone: &Phone) -> Result<User, AuthError> {
        self.users
            .find_by_phone(phone)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn signup(&self, name: &str, phone: Phone) -> Result<User, AuthError> {
        let new_user = NewUser {
            name: name.to_owned(),
            phone,
            created_at: Utc::now(),
        };

        self.users.create(new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserExists,
            other => AuthError::Failure(other),
        })
    }
}
