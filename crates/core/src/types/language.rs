//! Display languages.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a language code is not one of `ar`, `he`, `en`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported language code: {0}")]
pub struct UnknownLanguage(pub String);

/// A language every page and message can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// Arabic (right-to-left).
    #[default]
    #[serde(rename = "ar")]
    Arabic,
    /// Hebrew (right-to-left).
    #[serde(rename = "he")]
    Hebrew,
    /// English (left-to-right).
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// All supported languages, in the order the language picker shows them.
    pub const ALL: [Self; 3] = [Self::Arabic, Self::Hebrew, Self::English];

    /// BCP 47 code used in `lang` attributes and form values.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Arabic => "ar",
            Self::Hebrew => "he",
            Self::English => "en",
        }
    }

    /// Name of the language written in itself.
    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::Arabic => "العربية",
            Self::Hebrew => "עברית",
            Self::English => "English",
        }
    }

    /// Whether text in this language runs right-to-left.
    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Arabic | Self::Hebrew)
    }

    /// Value for the HTML `dir` attribute.
    #[must_use]
    pub const fn dir(self) -> &'static str {
        if self.is_rtl() { "rtl" } else { "ltr" }
    }

    /// Parse a language code (`ar`, `he`, `en`, case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`UnknownLanguage`] for any other code.
    pub fn parse(code: &str) -> Result<Self, UnknownLanguage> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ar" => Ok(Self::Arabic),
            "he" | "iw" => Ok(Self::Hebrew),
            "en" => Ok(Self::English),
            other => Err(UnknownLanguage(other.to_owned())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rtl_languages() {
        assert_eq!(Language::Arabic.dir(), "rtl");
        assert_eq!(Language::Hebrew.dir(), "rtl");
        assert_eq!(Language::English.dir(), "ltr");
    }

    #[test]
    fn parse_codes() {
        assert_eq!(Language::parse("AR"), Ok(Language::Arabic));
        assert_eq!(Language::parse(" he "), Ok(Language::Hebrew));
        assert_eq!(Language::parse("en"), Ok(Language::English));
        assert!(Language::parse("fr").is_err());
    }

    #[test]
    fn serde_uses_codes() {
        assert_eq!(
            serde_json::to_string(&Language::Hebrew).ok().as_deref(),
            Some("\"he\"")
        );
    }
}
