use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use std::env::var;

/// Get the value of ENV var, or a default
///
/// Only when:
/// - It is set
/// - It is not empty
pub fn env_var_or_else(var_name: &'static str, or_else: fn() -> String) -> String {
    if let Ok(value) = var(var_name) {
        if !value.is_empty() {
            return value;
        }
    }

    or_else()
}

/// Format a timestamp as ISO-8601 UTC with a literal `Z` suffix
pub fn iso_utc(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_utc() {
        let timestamp = DateTime::parse_from_rfc3339("2024-05-01T12:30:00.250+00:00")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!("2024-05-01T12:30:00.250000Z", iso_utc(&timestamp));
    }

    #[test]
    fn test_iso_utc_always_ends_with_z() {
        assert!(iso_utc(&Utc::now()).ends_with('Z'));
    }
}
