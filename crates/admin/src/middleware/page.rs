//! Layout data shared by every admin page.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use tandaro_core::{I18n, Language};

use super::auth::current_admin;
use crate::models::{CurrentAdmin, session_keys};

/// Translator, signed-in admin and request path for the layout.
#[derive(Debug, Clone)]
pub struct AdminPage {
    pub i18n: I18n,
    pub admin: Option<CurrentAdmin>,
    pub path: String,
}

impl AdminPage {
    /// Active language.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.i18n.lang()
    }

    /// Whether `lang` is the active language, for the picker.
    #[must_use]
    pub fn is_language(&self, lang: &Language) -> bool {
        self.i18n.lang() == *lang
    }

    /// Languages offered by the picker.
    #[must_use]
    pub const fn languages(&self) -> [Language; 3] {
        Language::ALL
    }
}

impl<S> FromRequestParts<S> for AdminPage
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let (language, admin) = match parts.extensions.get::<Session>() {
            Some(session) => (language(session).await, current_admin(session).await),
            None => (Language::default(), None),
        };

        Ok(Self {
            i18n: I18n::new(language),
            admin,
            path: parts.uri.path().to_owned(),
        })
    }
}

/// Stored display language, Arabic when unset.
pub async fn language(session: &Session) -> Language {
    session
        .get::<Language>(session_keys::LANGUAGE)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the display language.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_language(
    session: &Session,
    language: Language,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::LANGUAGE, language).await
}
