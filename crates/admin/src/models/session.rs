//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state and preferences.

use serde::{Deserialize, Serialize};

use tandaro_core::{Phone, User, UserId};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's user ID.
    pub id: UserId,
    /// Admin's display name.
    pub name: String,
    /// Admin's canonical phone.
    pub phone: Phone,
}

impl CurrentAdmin {
    /// Uploader tag written on gallery records and object metadata.
    #[must_use]
    pub fn uploader_tag(&self) -> String {
        format!("admin:{}", self.id)
    }
}

impl From<User> for CurrentAdmin {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            phone: user.phone,
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the display language code.
    pub const LANGUAGE: &str = "language";
}
