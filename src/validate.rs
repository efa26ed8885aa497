//! Validation of user supplied values
//!
//! Pure functions, no storage involved

use url::Url;

/// Validity period used when the request does not provide one
pub const DEFAULT_VALIDITY_MINUTES: i64 = 30;

/// Longest allowed validity period, 7 days
pub const MAX_VALIDITY_MINUTES: i64 = 60 * 24 * 7;

/// Shortest allowed shortcode
const MIN_SHORTCODE_LENGTH: usize = 3;

/// Longest allowed shortcode
const MAX_SHORTCODE_LENGTH: usize = 32;

/// Parse a target URL
///
/// Only `http` and `https` URLs with a non-empty host are accepted; the
/// scheme check is case-sensitive on the raw input
pub fn parse_url(url: &str) -> Option<Url> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return None;
    }

    let url = Url::parse(url).ok()?;

    if url.host_str().is_some_and(|host| !host.is_empty()) {
        Some(url)
    } else {
        None
    }
}

/// Is this a URL we are willing to redirect to?
pub fn is_valid_url(url: &str) -> bool {
    parse_url(url).is_some()
}

/// Is this a well-formed shortcode?
///
/// Well-formed means 3 up to 32 characters of `[A-Za-z0-9_-]`
pub fn is_valid_shortcode(shortcode: &str) -> bool {
    let length = shortcode.chars().count();

    if !(MIN_SHORTCODE_LENGTH..=MAX_SHORTCODE_LENGTH).contains(&length) {
        return false;
    }

    shortcode
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

/// Is this an acceptable validity period in minutes?
pub fn is_valid_validity(minutes: i64) -> bool {
    (1..=MAX_VALIDITY_MINUTES).contains(&minutes)
}
