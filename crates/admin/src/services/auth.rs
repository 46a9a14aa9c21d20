//! Administrator sign-in.
//!
//! Admins sign in with their phone number only. The number must belong to a
//! registered user carrying the administrator flag.

use thiserror::Error;

use tandaro_core::{Phone, PhoneError, RepositoryError, Text, User, UserDirectory};

/// Why an admin sign-in was refused.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    #[error("invalid phone: {0}")]
    InvalidPhone(#[from] PhoneError),

    #[error("no user with this phone")]
    UserNotFound,

    #[error("user is not an administrator")]
    Forbidden,

    #[error("user directory failed: {0}")]
    Failure(#[from] RepositoryError),
}

impl AdminAuthError {
    /// Translated message key for the login page.
    #[must_use]
    pub const fn text(&self) -> Text {
        match self {
            Self::InvalidPhone(_) => Text::InvalidPhone,
            Self::UserNotFound => Text::UserNotFound,
            Self::Forbidden => Text::NotAdmin,
            Self::Failure(_) => Text::AuthFailure,
        }
    }
}

/// Resolve `phone` to an administrator.
///
/// # Errors
///
/// Returns `InvalidPhone` before any backend call, `UserNotFound` or
/// `Forbidden` when the number does not belong to an admin, and `Failure`
/// when the directory is unreachable.
pub async fn resolve_admin(users: &dyn UserDirectory, phone: &str) -> Result<User, AdminAuthError> {
    let phone = Phone::parse(phone)?;
    let user = users
        .find_by_phone(&phone)
        .await?
        .ok_or(AdminAuthError::UserNotFound)?;

    if !user.is_admin {
        return Err(AdminAuthError::Forbidden);
    }
    Ok(user)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use tandaro_core::NewUser;
    use tandaro_core::backend::MemoryUserDirectory;

    use super::*;

    async fn directory_with(phone: &str, is_admin: bool) -> MemoryUserDirectory {
        let users = MemoryUserDirectory::default();
        let phone = Phone::parse(phone).unwrap();
        users
            .create(NewUser {
                name: "Rana".to_string(),
                phone: phone.clone(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        if is_admin {
            users.set_admin(&phone, true).await.unwrap();
        }
        users
    }

    #[tokio::test]
    async fn admin_signs_in() {
        let users = directory_with("0501234567", true).await;
        let user = resolve_admin(&users, "+972-50-123-4567").await.unwrap();
        assert!(user.is_admin);
    }

    #[tokio::test]
    async fn customer_is_forbidden() {
        let users = directory_with("0501234567", false).await;
        let err = resolve_admin(&users, "0501234567").await.unwrap_err();
        assert!(matches!(err, AdminAuthError::Forbidden));
        assert_eq!(err.text(), Text::NotAdmin);
    }

    #[tokio::test]
    async fn unknown_phone() {
        let users = directory_with("0501234567", true).await;
        let err = resolve_admin(&users, "0529999999").await.unwrap_err();
        assert!(matches!(err, AdminAuthError::UserNotFound));
    }

    #[tokio::test]
    async fn invalid_phone_skips_backend() {
        let users = MemoryUserDirectory::default();
        let err = resolve_admin(&users, "12").await.unwrap_err();
        assert!(matches!(err, AdminAuthError::InvalidPhone(_)));
        assert_eq!(users.calls(), 0);
    }
}
