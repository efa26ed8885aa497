//! Links

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

/// A shortened link
#[derive(Clone, Debug)]
pub struct Link {
    /// Link ID
    pub id: Uuid,

    /// External identifier for the link, unique across all links
    pub shortcode: String,

    /// Location where the link redirects to
    pub long_url: String,

    /// Creation date
    pub created_at: DateTime<Utc>,

    /// Moment the link stops redirecting
    pub expiry_at: DateTime<Utc>,

    /// Number of successful redirects, one per recorded click
    pub clicks_count: i64,
}

impl Link {
    /// Has the link expired?
    ///
    /// The boundary is inclusive: a link is expired at exactly its expiry
    /// moment
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn link_with_expiry(expiry_at: DateTime<Utc>) -> Link {
        Link {
            id: Uuid::new_v4(),
            shortcode: "abc1234".to_string(),
            long_url: "https://www.example.com/".to_string(),
            created_at: expiry_at - Duration::minutes(30),
            expiry_at,
            clicks_count: 0,
        }
    }

    #[test]
    fn test_is_expired_before_expiry() {
        let now = Utc::now();
        let link = link_with_expiry(now + Duration::minutes(1));

        assert!(!link.is_expired(now));
    }

    #[test]
    fn test_is_expired_at_exact_expiry() {
        let now = Utc::now();
        let link = link_with_expiry(now);

        assert!(link.is_expired(now));
    }

    #[test]
    fn test_is_expired_after_expiry() {
        let now = Utc::now();
        let link = link_with_expiry(now - Duration::seconds(1));

        assert!(link.is_expired(now));
    }
}
