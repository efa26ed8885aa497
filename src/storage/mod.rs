//! All things related to the storage of links and clicks

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;
use url::Url;

use crate::clicks::Click;
use crate::links::Link;

#[cfg(feature = "postgres")]
use postgres::Postgres;

pub mod memory;
#[cfg(feature = "postgres")]
mod postgres;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> memory::Memory {
    memory::Memory::new()
}

/// Setup the storage
#[cfg(feature = "postgres")]
pub async fn setup() -> Postgres {
    Postgres::new().await
}

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// The shortcode is already claimed by another link
    ///
    /// Surfaced from the uniqueness guarantee of the backend, never from a
    /// check-then-insert
    #[error("shortcode already exists")]
    Collision,

    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a Link
pub struct CreateLinkValues<'a> {
    /// The shortcode of the link
    pub shortcode: &'a str,

    /// The URL the link redirects to
    pub long_url: &'a Url,

    /// Moment the link stops redirecting
    pub expiry_at: DateTime<Utc>,
}

/// Values to record a Click
pub struct RecordClickValues<'a> {
    /// Referrer, or `"direct"`
    pub source: &'a str,

    /// Truncated user agent
    pub user_agent: &'a str,

    /// Coarsened visitor address
    pub geo: &'a str,
}

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Create a link
    ///
    /// Fails with [`Error::Collision`] when the shortcode is already in use;
    /// concurrent creates with the same shortcode resolve to exactly one
    /// winner
    async fn create_link(&self, values: &CreateLinkValues) -> Result<Link>;

    /// Find a single link by its shortcode
    async fn find_link_by_shortcode(&self, shortcode: &str) -> Result<Option<Link>>;

    /// Record a click on a link
    ///
    /// The click insert and the increment of the link's click counter are
    /// one atomic unit, the counter always matches the number of clicks
    async fn record_click(&self, link: &Link, values: &RecordClickValues) -> Result<Click>;

    /// Find all clicks of a link, oldest first
    async fn find_clicks_by_link(&self, link: &Link) -> Result<Vec<Click>>;
}
