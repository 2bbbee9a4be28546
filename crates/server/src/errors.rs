use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use service::errors::{FieldErrors, ServiceError};

/// JSON error body: `{ status, error, detail, fields }`.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    pub status: u16,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, detail: Option<String>) -> Self {
        Self { status: status.as_u16(), error: error.to_string(), detail, fields: None }
    }

    pub fn unauthorized(detail: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(detail.to_string()))
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
            ServiceError::FieldValidation(fields) => JsonApiError {
                fields: Some(fields),
                ..JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", None)
            },
            ServiceError::Model(models::errors::ModelError::Validation(msg)) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg))
            }
            ServiceError::Forbidden(msg) => JsonApiError::new(StatusCode::FORBIDDEN, "Forbidden", Some(msg)),
            ServiceError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Conflict(msg) => JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            ServiceError::Unauthorized(msg) => {
                warn!(detail = %msg, "request rejected as unauthorized");
                JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(msg))
            }
            other @ (ServiceError::Db(_) | ServiceError::Model(models::errors::ModelError::Db(_))) => {
                error!(error = %other, "internal error");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
        }
    }
}

impl From<service::auth::errors::AuthError> for JsonApiError {
    fn from(e: service::auth::errors::AuthError) -> Self { ServiceError::from(e).into() }
}
