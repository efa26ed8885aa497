//! API request helpers

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::extract::Json;
use axum::extract::Path;
use axum::extract::Request;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::Error;

fn parse_json<J>(json: Result<Json<J>, JsonRejection>) -> Result<J, Error> {
    match json {
        Ok(Json(json)) => Ok(json),
        Err(err) => match err {
            JsonRejection::JsonDataError(_err) => Err(Error::BadRequest("Data error".to_string())),
            JsonRejection::JsonSyntaxError(_err) => {
                Err(Error::BadRequest("JSON syntax error".to_string()))
            }
            JsonRejection::MissingJsonContentType(_err) => Err(Error::BadRequest(
                "Missing `application/json` content type".to_string(),
            )),
            JsonRejection::BytesRejection(_err) => {
                Err(Error::BadRequest("Invalid characters in JSON".to_string()))
            }
            _err => Err(Error::BadRequest("Unknown JSON error".to_string())),
        },
    }
}

/// Wrapper for the JSON extractor
///
/// Turns the plain-text rejections of the default extractor into the JSON
/// error bodies of the rest of the API
pub struct Form<F>(pub F);

impl<S, F> FromRequest<S> for Form<F>
where
    S: Send + Sync,
    F: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = Json::<F>::from_request(req, state).await;

        parse_json(json).map(Form)
    }
}

fn parse_path<P>(path: Result<Path<P>, PathRejection>) -> Result<P, Error> {
    match path {
        Ok(Path(path)) => Ok(path),
        Err(err) => match err {
            PathRejection::FailedToDeserializePathParams(_err) => {
                Err(Error::BadRequest("Invalid path parameter".to_string()))
            }
            PathRejection::MissingPathParams(_err) => {
                Err(Error::BadRequest("Missing path parameter".to_string()))
            }
            _err => Err(Error::BadRequest("Unknown path error".to_string())),
        },
    }
}

/// Wrapper for the path extractor
pub struct PathParameters<P>(pub P);

impl<S, P> FromRequestParts<S> for PathParameters<P>
where
    S: Send + Sync,
    P: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = Path::<P>::from_request_parts(parts, state).await;

        parse_path(path).map(PathParameters)
    }
}
