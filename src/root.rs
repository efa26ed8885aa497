//! The root!
//!
//! The most important part of Trimly, the actual redirect logic

use axum::Extension;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::LOCATION;
use axum_extra::TypedHeader;
use axum_extra::headers::UserAgent;
use chrono::Utc;
use percent_encoding::percent_decode_str;

use crate::api::Error;
use crate::audit::Audit;
use crate::audit::AuditEvent;
use crate::clicks;
use crate::client_ip::ClientIp;
use crate::storage::RecordClickValues;
use crate::storage::Storage;
use crate::validate;

/// The root!
///
/// All wildcard requests end up in this function.
///
/// A lookup in storage will be done looking for the right shortcode, based
/// on the path. A successful lookup records a click and answers with a
/// `302 Found` to the target; malformed and missing shortcodes are the same
/// `404` on purpose.
pub async fn root<S: Storage>(
    client_ip: Option<ClientIp>,
    user_agent: Option<TypedHeader<UserAgent>>,
    Extension(storage): Extension<S>,
    Extension(audit): Extension<Audit>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<(StatusCode, HeaderMap), Error> {
    let shortcode = uri.path().trim_matches('/');
    let shortcode = percent_decode_str(shortcode)
        .decode_utf8()
        .map_err(|_| Error::NotFound)?;

    tracing::debug!("Looking for shortcode: /{shortcode}");

    if !validate::is_valid_shortcode(&shortcode) {
        return Err(Error::NotFound);
    }

    let link = storage
        .find_link_by_shortcode(&shortcode)
        .await?
        .ok_or(Error::NotFound)?;

    if link.is_expired(Utc::now()) {
        tracing::debug!(r#"Shortcode "{shortcode}" has expired"#);

        audit.record(&AuditEvent::RedirectExpired {
            shortcode: link.shortcode.clone(),
        });

        return Err(Error::Expired);
    }

    let source = referrer_source(&headers);
    let user_agent = user_agent
        .map(|TypedHeader(user_agent)| user_agent.as_str().to_string())
        .unwrap_or_default();
    let user_agent = clicks::truncate_user_agent(&user_agent);
    let geo = clicks::coarse_geo(client_ip.as_ref().map(|ClientIp(address)| address.as_str()));

    let values = RecordClickValues {
        source: &source,
        user_agent: &user_agent,
        geo: &geo,
    };

    storage.record_click(&link, &values).await?;

    audit.record(&AuditEvent::RedirectHit {
        shortcode: link.shortcode.clone(),
        source,
        geo,
    });

    tracing::debug!(r#"Shortcode "{shortcode}" redirecting to: {}"#, link.long_url);

    let mut headers = HeaderMap::new();

    headers.insert(
        LOCATION,
        HeaderValue::from_str(&link.long_url).expect("Valid URL"),
    );

    Ok((StatusCode::FOUND, headers))
}

/// The source of a visit: the referrer header, or `"direct"`
///
/// Both the standard `Referer` spelling and the correct one are accepted;
/// empty values count as absent
fn referrer_source(headers: &HeaderMap) -> String {
    ["referer", "referrer"]
        .into_iter()
        .find_map(|name| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
        })
        .unwrap_or(clicks::DIRECT_SOURCE)
        .to_string()
}
