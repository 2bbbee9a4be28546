//! JSON request bodies whose rejections use the API error body.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::{async_trait, Json};
use serde::de::DeserializeOwned;

use service::errors::FieldErrors;

use crate::errors::JsonApiError;

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Drop-in for [`axum::Json`] on the request side.
///
/// A body that parses but does not fit the target type is a 400 with a
/// `fields` entry when the offending field can be named.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                let text = e.body_text();
                match field_errors(&text) {
                    Some(fields) => JsonApiError { fields: Some(fields), ..JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", None) },
                    None => JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(strip_prefix(&text).to_string())),
                }
            }
            JsonRejection::JsonSyntaxError(_) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Request", Some("Request body is not valid JSON.".into()))
            }
            other => JsonApiError::new(other.status(), "Bad Request", Some(other.body_text())),
        }
    }
}

fn strip_prefix(text: &str) -> &str {
    text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(text)
}

/// Name the field serde complained about.
///
/// serde reports either `` missing field `x` `` at the top level or
/// `path: problem` for a value that has the wrong shape.
fn field_errors(text: &str) -> Option<FieldErrors> {
    let msg = strip_prefix(text);
    let msg = msg.split(" at line ").next().unwrap_or(msg);

    let (field, problem) = match msg.strip_prefix("missing field `") {
        Some(rest) => (rest.split('`').next()?.to_string(), "This field is required.".to_string()),
        None => {
            let (path, problem) = msg.split_once(": ")?;
            if path.is_empty() || path.contains(char::is_whitespace) {
                return None;
            }
            (path.to_string(), problem.to_string())
        }
    };

    let mut fields = FieldErrors::new();
    fields.entry(field).or_default().push(problem);
    Some(fields)
}
