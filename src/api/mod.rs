//! All API endpoint setup

use axum::Router;
use axum::routing::get;
use axum::routing::post;

pub use request::Form;
pub use request::PathParameters;
pub use response::Error;
pub use response::Success;

use crate::storage::Storage;

mod request;
mod response;
mod shorturls;

/// Get the Axum router for all short URL routes
pub fn router<S: Storage>() -> Router {
    Router::new()
        .route("/shorturls", post(shorturls::create::<S>))
        .route("/shorturls/{shortcode}", get(shorturls::stats::<S>))
}

/// Base URL short links are served under
///
/// Normalized to end with a `/`, so a shortcode can be appended directly
#[derive(Clone, Debug)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Create a new base URL
    pub fn new<B>(base: B) -> Self
    where
        B: Into<String>,
    {
        let mut base = base.into();

        if !base.ends_with('/') {
            base.push('/');
        }

        Self(base)
    }

    /// The full short link for a shortcode
    pub fn short_link(&self, shortcode: &str) -> String {
        format!("{}{shortcode}", self.0)
    }
}
