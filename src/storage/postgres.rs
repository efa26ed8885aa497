//! Postgres storage

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::clicks::Click;
use crate::links::Link;

use super::CreateLinkValues;
use super::Error;
use super::RecordClickValues;
use super::Result;
use super::Storage;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable
    ///
    /// Migrations will be run
    pub async fn new() -> Self {
        let database_connection_string = std::env::var("DATABASE_URL").expect("Valid DATABASE_URL");

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .expect("Valid connection");

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> Self {
        let migration_result = MIGRATOR.run(&connection_pool).await;

        if let Err(err) = migration_result {
            panic!("Migrations could not run: {err}");
        }

        Self { connection_pool }
    }
}

/// Postgres version of a link
#[derive(sqlx::FromRow)]
struct SqlxLink {
    /// Link ID
    id: Uuid,

    /// Shortcode
    shortcode: String,

    /// Redirect target
    long_url: String,

    /// Creation date
    created_at: DateTime<Utc>,

    /// Expiry moment
    expiry_at: DateTime<Utc>,

    /// Click counter
    clicks_count: i64,
}

impl Link {
    /// Create link from postgres version
    fn from_sqlx_link(link: SqlxLink) -> Self {
        Self {
            id: link.id,
            shortcode: link.shortcode,
            long_url: link.long_url,
            created_at: link.created_at,
            expiry_at: link.expiry_at,
            clicks_count: link.clicks_count,
        }
    }

    /// Maybe create link from postgres version
    fn from_sqlx_link_optional(link: Option<SqlxLink>) -> Option<Self> {
        link.map(Self::from_sqlx_link)
    }
}

/// Postgres version of a click
#[derive(sqlx::FromRow)]
struct SqlxClick {
    /// Click ID
    id: Uuid,

    /// Owning link ID
    link_id: Uuid,

    /// Moment of the redirect
    timestamp: DateTime<Utc>,

    /// Referrer
    source: String,

    /// Truncated user agent
    user_agent: String,

    /// Coarsened address
    geo: String,
}

impl Click {
    /// Create click from postgres version
    fn from_sqlx_click(click: SqlxClick) -> Self {
        Self {
            id: click.id,
            link_id: click.link_id,
            timestamp: click.timestamp,
            source: click.source,
            user_agent: click.user_agent,
            geo: click.geo,
        }
    }

    /// Create clicks from multiple postgres versions
    fn from_sqlx_click_multiple(clicks: Vec<SqlxClick>) -> Vec<Self> {
        clicks.into_iter().map(Self::from_sqlx_click).collect()
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn create_link(&self, values: &CreateLinkValues) -> Result<Link> {
        let link = sqlx::query_as::<_, SqlxLink>(
            r"
            INSERT INTO links (id, shortcode, long_url, expiry_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, shortcode, long_url, created_at, expiry_at, clicks_count
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.shortcode)
        .bind(values.long_url.to_string())
        .bind(values.expiry_at)
        .fetch_one(&self.connection_pool)
        .await
        .map(Link::from_sqlx_link)
        .map_err(create_link_error)?;

        Ok(link)
    }

    async fn find_link_by_shortcode(&self, shortcode: &str) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, SqlxLink>(
            r"
            SELECT id, shortcode, long_url, created_at, expiry_at, clicks_count
            FROM links
            WHERE shortcode = $1
            LIMIT 1
            ",
        )
        .bind(shortcode)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Link::from_sqlx_link_optional)
        .map_err(connection_error)?;

        Ok(link)
    }

    async fn record_click(&self, link: &Link, values: &RecordClickValues) -> Result<Click> {
        let mut transaction = self
            .connection_pool
            .begin()
            .await
            .map_err(connection_error)?;

        let click = sqlx::query_as::<_, SqlxClick>(
            r"
            INSERT INTO clicks (id, link_id, source, user_agent, geo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, link_id, timestamp, source, user_agent, geo
            ",
        )
        .bind(Uuid::new_v4())
        .bind(link.id)
        .bind(values.source)
        .bind(values.user_agent)
        .bind(values.geo)
        .fetch_one(&mut *transaction)
        .await
        .map(Click::from_sqlx_click)
        .map_err(connection_error)?;

        sqlx::query(
            r"
            UPDATE links
            SET clicks_count = clicks_count + 1
            WHERE id = $1
            ",
        )
        .bind(link.id)
        .execute(&mut *transaction)
        .await
        .map_err(connection_error)?;

        transaction.commit().await.map_err(connection_error)?;

        Ok(click)
    }

    async fn find_clicks_by_link(&self, link: &Link) -> Result<Vec<Click>> {
        let clicks = sqlx::query_as::<_, SqlxClick>(
            r"
            SELECT id, link_id, timestamp, source, user_agent, geo
            FROM clicks
            WHERE link_id = $1
            ORDER BY timestamp ASC
            ",
        )
        .bind(link.id)
        .fetch_all(&self.connection_pool)
        .await
        .map(Click::from_sqlx_click_multiple)
        .map_err(connection_error)?;

        Ok(clicks)
    }
}

/// Map a unique constraint violation to a collision, everything else to a
/// connection error
fn create_link_error(err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Error::Collision,
        _ => connection_error(err),
    }
}

/// Convert `SQLx` to storage connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}
