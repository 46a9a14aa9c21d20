//! Administrator flag management.
//!
//! # Usage
//!
//! ```bash
//! # Let a registered user sign in to the admin panel
//! tandaro-cli admin grant --phone 050-123-4567
//!
//! # Take it away again
//! tandaro-cli admin grant --phone 050-123-4567 --revoke
//! ```

use tandaro_core::db::PgUserDirectory;
use tandaro_core::{Phone, RepositoryError, UserDirectory};

use super::{CliError, connect};

/// Set or clear the administrator flag of the user with `phone`.
///
/// The user must have signed up on the storefront first.
///
/// # Errors
///
/// Returns `CliError::Phone` for an invalid number and
/// `CliError::Repository` if no user has it.
pub async fn grant(phone: &str, revoke: bool) -> Result<(), CliError> {
    let phone = Phone::parse(phone)?;
    let users = PgUserDirectory::new(connect().await?);

    let user = users.set_admin(&phone, !revoke).await.map_err(|e| {
        if matches!(e, RepositoryError::NotFound) {
            tracing::error!("No user with phone {phone}; sign up on the storefront first");
        }
        e
    })?;

    tracing::info!(
        user_id = %user.id,
        phone = %user.phone,
        is_admin = user.is_admin,
        "Administrator flag updated"
    );
    Ok(())
}
