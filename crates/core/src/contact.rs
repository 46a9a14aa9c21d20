//! WhatsApp click-to-chat links.

use url::Url;

const WA_ME: &str = "https://wa.me/";

/// Build `https://wa.me/<digits>?text=<greeting>`.
///
/// Non-digit characters in `number` are dropped, so `+972 50-123-4567` and
/// `972501234567` give the same link. Returns `None` when no digits remain.
#[must_use]
pub fn whatsapp_link(number: &str, greeting: &str) -> Option<String> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    let mut url = Url::parse(WA_ME).ok()?.join(&digits).ok()?;
    if !greeting.is_empty() {
        url.query_pairs_mut().append_pair("text", greeting);
    }
    Some(url.into())
}
