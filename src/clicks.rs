//! Clicks
//!
//! A click is recorded for every successful redirect, with coarse metadata
//! about where it came from

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

/// Maximum number of characters kept of a user agent
pub const MAX_USER_AGENT_LENGTH: usize = 500;

/// Source value when no referrer is available
pub const DIRECT_SOURCE: &str = "direct";

/// Geo value when no usable address is available
pub const UNKNOWN_GEO: &str = "unknown";

/// A single redirect event on a link
#[derive(Clone, Debug)]
pub struct Click {
    /// Click ID
    pub id: Uuid,

    /// The link this click belongs to
    pub link_id: Uuid,

    /// Moment of the redirect
    pub timestamp: DateTime<Utc>,

    /// Referrer, or `"direct"` when the visitor came without one
    pub source: String,

    /// User agent of the visitor, truncated
    pub user_agent: String,

    /// Coarsened address of the visitor, or `"unknown"`
    pub geo: String,
}

/// Truncate a user agent to [`MAX_USER_AGENT_LENGTH`] characters
pub fn truncate_user_agent(user_agent: &str) -> String {
    user_agent.chars().take(MAX_USER_AGENT_LENGTH).collect()
}

/// Coarsen an address into a privacy-reduced representation
///
/// - IPv4: the last two octets are masked, `1.2.3.4` becomes `1.2.x.x`
/// - Anything with colons: the first three colon-groups are kept and a
///   `::/48` suffix is appended; compressed (`::`) notation is not expanded,
///   so the prefix is best-effort rather than a precise CIDR computation
/// - Absent or unrecognizable input becomes `"unknown"`
pub fn coarse_geo(address: Option<&str>) -> String {
    let Some(address) = address else {
        return UNKNOWN_GEO.to_string();
    };

    if address.is_empty() {
        return UNKNOWN_GEO.to_string();
    }

    if address.contains(':') {
        let groups = address.split(':').take(3).collect::<Vec<&str>>();

        return format!("{}::/48", groups.join(":"));
    }

    let octets = address.split('.').collect::<Vec<&str>>();

    if let [first, second, _, _] = octets[..] {
        format!("{first}.{second}.x.x")
    } else {
        UNKNOWN_GEO.to_string()
    }
}
