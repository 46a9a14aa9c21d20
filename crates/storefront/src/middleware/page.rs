//! Per-request page context: language, signed-in user, widget settings.
//!
//! Every template renders the shared layout from a [`Page`], so the
//! language picker, the WhatsApp button and the notification-sound flag
//! behave the same on every route.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use tandaro_core::contact::whatsapp_link;
use tandaro_core::{I18n, Language, Text};

use super::auth::current_user;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Shared layout data for one rendered page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Translator for the visitor's language.
    pub i18n: I18n,
    /// Signed-in user, if any.
    pub user: Option<CurrentUser>,
    /// Whether notification sounds are on.
    pub notification_sound: bool,
    /// Click-to-chat link with a greeting in the active language.
    pub whatsapp_url: Option<String>,
    /// Path of this request, used as the return target of layout forms.
    pub path: String,
}

impl Page {
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

impl FromRequestParts<AppState> for Page {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>();
        let (language, notification_sound, user) = match session {
            Some(session) => (
                language(session).await,
                notification_sound(session).await,
                current_user(session).await,
            ),
            None => (Language::default(), true, None),
        };

        let i18n = I18n::new(language);
        let whatsapp_url = whatsapp_link(
            &state.config().whatsapp_number,
            i18n.t(Text::WhatsAppGreeting),
        );

        Ok(Self {
            i18n,
            user,
            notification_sound,
            whatsapp_url,
            path: parts.uri.path().to_owned(),
        })
    }
}

/// Stored display language, Arabic when unset or unreadable.
pub async fn language(session: &Session) -> Language {
    session
        .get::<Language>(session_keys::LANGUAGE)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Stored notification-sound preference, on when unset.
pub async fn notification_sound(session: &Session) -> bool {
    session
        .get::<bool>(session_keys::NOTIFICATION_SOUND)
        .await
        .ok()
        .flatten()
        .unwrap_or(true)
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

/// Persist the notification-sound preference.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_notification_sound(
    session: &Session,
    enabled: bool,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::NOTIFICATION_SOUND, enabled)
        .await
}
