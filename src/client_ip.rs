//! Optional client address extractor.
//!
//! Prefers the first entry of the `X-Forwarded-For` header, falling back to
//! the peer address of the connection. The value stays a string: it only
//! feeds the coarse geo derivation, which works on raw text.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::extract::OptionalFromRequestParts;
use axum::http::request::Parts;

/// Client address extractor.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl<S> OptionalFromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(address_from_parts(parts).map(Self))
    }
}

/// Pick the client address out of the request parts
fn address_from_parts(parts: &Parts) -> Option<String> {
    let forwarded = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|entry| !entry.is_empty());

    if let Some(entry) = forwarded {
        return Some(entry.to_string());
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(address)| address.ip().to_string())
}
