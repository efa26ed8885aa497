//! Short URL API endpoints
//!
//! Creation of short links and reading their click statistics

use axum::Extension;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::audit::Audit;
use crate::audit::AuditEvent;
use crate::clicks::Click;
use crate::clicks::DIRECT_SOURCE;
use crate::clicks::UNKNOWN_GEO;
use crate::codegen;
use crate::links::Link;
use crate::storage;
use crate::storage::CreateLinkValues;
use crate::storage::Storage;
use crate::utils::iso_utc;
use crate::validate;

use super::BaseUrl;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;

/// How often an auto-generated code may collide before giving up
const MAX_GENERATE_ATTEMPTS: usize = 5;

/// Create short URL form
///
/// Fields to create a short link with
#[derive(Debug, Deserialize)]
pub struct CreateShortUrlForm {
    /// The target to redirect to
    url: String,

    /// Validity period in minutes, defaults to 30
    validity: Option<i64>,

    /// Custom shortcode; one is generated when absent or blank
    shortcode: Option<String>,
}

/// Short link response going to the user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkResponse {
    /// The full short link
    short_link: String,

    /// Moment the link stops redirecting
    expiry: String,
}

/// Create a short link based on the [`CreateShortUrlForm`](CreateShortUrlForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "url": "https://www.example.com/", "validity": 30 }' \
///     http://localhost:7000/shorturls
/// ```
///
/// Response:
/// ```json
/// { "shortLink": "http://localhost:7000/Ab3dE9f", "expiry": "2024-05-01T12:30:00.000000Z" }
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    Extension(base_url): Extension<BaseUrl>,
    Extension(audit): Extension<Audit>,
    Form(form): Form<CreateShortUrlForm>,
) -> Result<Success<ShortLinkResponse>, Error> {
    let Some(long_url) = validate::parse_url(&form.url) else {
        return Err(Error::InvalidUrl);
    };

    let validity = form.validity.unwrap_or(validate::DEFAULT_VALIDITY_MINUTES);

    if !validate::is_valid_validity(validity) {
        return Err(Error::InvalidValidity);
    }

    let expiry_at = Utc::now() + Duration::minutes(validity);

    // a blank custom shortcode means: generate one
    let custom_shortcode = form
        .shortcode
        .as_deref()
        .map(str::trim)
        .filter(|shortcode| !shortcode.is_empty());

    if let Some(shortcode) = custom_shortcode {
        if !validate::is_valid_shortcode(shortcode) {
            return Err(Error::InvalidShortcodeFormat);
        }

        let values = CreateLinkValues {
            shortcode,
            long_url: &long_url,
            expiry_at,
        };

        match storage.create_link(&values).await {
            Ok(link) => Ok(created_response(&base_url, &audit, link)),
            Err(storage::Error::Collision) => {
                audit.record(&AuditEvent::ShortcodeCollision {
                    shortcode: shortcode.to_string(),
                });

                Err(Error::ShortcodeCollision)
            }
            Err(err) => Err(err.into()),
        }
    } else {
        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let shortcode = codegen::generate_code(&mut rand::rng(), codegen::CODE_LENGTH);

            let values = CreateLinkValues {
                shortcode: &shortcode,
                long_url: &long_url,
                expiry_at,
            };

            match storage.create_link(&values).await {
                Ok(link) => return Ok(created_response(&base_url, &audit, link)),
                Err(storage::Error::Collision) => {
                    tracing::debug!(r#"Generated shortcode "{shortcode}" collided, retrying"#);
                }
                Err(err) => return Err(err.into()),
            }
        }

        audit.record(&AuditEvent::AutogenFailed);

        Err(Error::GenerationExhausted)
    }
}

/// Assemble the created response, with its audit event
fn created_response(base_url: &BaseUrl, audit: &Audit, link: Link) -> Success<ShortLinkResponse> {
    let expiry = iso_utc(&link.expiry_at);

    audit.record(&AuditEvent::ShortCreated {
        shortcode: link.shortcode.clone(),
        long_url: link.long_url.clone(),
        expiry: expiry.clone(),
    });

    Success::created(ShortLinkResponse {
        short_link: base_url.short_link(&link.shortcode),
        expiry,
    })
}

/// Stats response going to the user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// The full short link
    short_link: String,

    /// The target the link redirects to
    target_url: String,

    /// Creation date
    created_at: String,

    /// Moment the link stops redirecting
    expiry: String,

    /// Number of recorded clicks
    total_clicks: i64,

    /// Every recorded click, oldest first
    clicks: Vec<ClickItem>,
}

/// A single click in the stats response
#[derive(Debug, Serialize)]
pub struct ClickItem {
    /// Moment of the redirect
    timestamp: String,

    /// Referrer, or `"direct"`
    source: String,

    /// Coarsened visitor address, or `"unknown"`
    geo: String,
}

impl ClickItem {
    /// Create a response item from a [`Click`](Click)
    fn from_click(click: Click) -> Self {
        Self {
            timestamp: iso_utc(&click.timestamp),
            source: if click.source.is_empty() {
                DIRECT_SOURCE.to_string()
            } else {
                click.source
            },
            geo: if click.geo.is_empty() {
                UNKNOWN_GEO.to_string()
            } else {
                click.geo
            },
        }
    }
}

/// Get the stats of a single short link
///
/// Request:
/// ```sh
/// curl -v http://localhost:7000/shorturls/Ab3dE9f
/// ```
///
/// Response:
/// ```json
/// { "shortLink": "...", "targetUrl": "...", "createdAt": "...", "expiry": "...", "totalClicks": 1, "clicks": [ ... ] }
/// ```
pub async fn stats<S: Storage>(
    Extension(storage): Extension<S>,
    Extension(base_url): Extension<BaseUrl>,
    Extension(audit): Extension<Audit>,
    PathParameters(shortcode): PathParameters<String>,
) -> Result<Success<StatsResponse>, Error> {
    // a malformed shortcode is indistinguishable from a missing one
    if !validate::is_valid_shortcode(&shortcode) {
        return Err(Error::NotFound);
    }

    let link = storage
        .find_link_by_shortcode(&shortcode)
        .await?
        .ok_or(Error::NotFound)?;

    let clicks = storage.find_clicks_by_link(&link).await?;

    audit.record(&AuditEvent::StatsView {
        shortcode: link.shortcode.clone(),
        total_clicks: link.clicks_count,
    });

    Ok(Success::ok(StatsResponse {
        short_link: base_url.short_link(&link.shortcode),
        target_url: link.long_url,
        created_at: iso_utc(&link.created_at),
        expiry: iso_utc(&link.expiry_at),
        total_clicks: link.clicks_count,
        clicks: clicks.into_iter().map(ClickItem::from_click).collect(),
    }))
}
