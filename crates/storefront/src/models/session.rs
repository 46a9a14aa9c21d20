//! Session-related types.
//!
//! Types stored in the session for authentication state and preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tandaro_core::{Phone, User, UserId};

/// Session-stored user identity.
///
/// A copy of the user record taken at login or signup time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's backend ID.
    pub id: UserId,
    /// Full name.
    pub name: String,
    /// Canonical phone.
    pub phone: Phone,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Administrator flag.
    pub is_admin: bool,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            phone: user.phone,
            created_at: user.created_at,
            is_admin: user.is_admin,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the notification-sound preference (absent means enabled).
    pub const NOTIFICATION_SOUND: &str = "notification_sound_enabled";

    /// Key for the display language code.
    pub const LANGUAGE: &str = "language";
}
