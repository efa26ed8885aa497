//! API response helpers

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

use crate::storage;

/// Hold data for a successful API interaction
pub struct Success<V>
where
    V: Serialize,
{
    status_code: StatusCode,
    data: V,
}

impl<V> Success<V>
where
    V: Serialize,
{
    pub fn ok(data: V) -> Self {
        Self {
            status_code: StatusCode::OK,
            data,
        }
    }

    pub fn created(data: V) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            data,
        }
    }
}

impl<V> IntoResponse for Success<V>
where
    V: Serialize,
{
    fn into_response(self) -> Response {
        (self.status_code, Json(self.data)).into_response()
    }
}

/// A failed API interaction
///
/// Every variant is request-scoped: it renders as a JSON error body with the
/// matching status code and never takes the process down
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target is not an `http`/`https` URL with a host
    #[error("invalid url")]
    InvalidUrl,

    /// The validity period is out of range
    #[error("invalid validity")]
    InvalidValidity,

    /// The custom shortcode is not well-formed
    #[error("invalid shortcode format")]
    InvalidShortcodeFormat,

    /// The custom shortcode is already claimed
    #[error("shortcode collision")]
    ShortcodeCollision,

    /// Code generation kept colliding and gave up
    #[error("failed to generate shortcode")]
    GenerationExhausted,

    /// No link for the shortcode
    ///
    /// Also covers malformed shortcodes, on purpose: probing clients can not
    /// tell a bad code from a missing one
    #[error("shortcode not found")]
    NotFound,

    /// The link exists but its validity period has passed
    #[error("expired link")]
    Expired,

    /// The request body could not be handled
    #[error("{0}")]
    BadRequest(String),

    /// The storage let us down
    #[error("storage error: {0}")]
    Storage(#[from] storage::Error),
}

impl Error {
    /// The status code the error renders with
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidUrl
            | Error::InvalidValidity
            | Error::InvalidShortcodeFormat
            | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::ShortcodeCollision => StatusCode::CONFLICT,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Expired => StatusCode::GONE,
            Error::GenerationExhausted | Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorWrapper {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorWrapper {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
