use std::collections::BTreeMap;

use thiserror::Error;

use crate::auth::errors::AuthError;

/// Per-field validation messages, keyed by request field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("validation failed for {}", field_names(.0))]
    FieldValidation(FieldErrors),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

fn field_names(fields: &FieldErrors) -> String {
    fields.keys().cloned().collect::<Vec<_>>().join(", ")
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn field(field: &str, msg: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![msg.into()]);
        Self::FieldValidation(fields)
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { ServiceError::Db(e.to_string()) }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        let code = e.code();
        match e {
            AuthError::Validation(msg) => ServiceError::Validation(msg),
            AuthError::Conflict(msg) => ServiceError::Conflict(msg),
            AuthError::NotFound(msg) => ServiceError::NotFound(msg),
            AuthError::Unauthorized | AuthError::Inactive | AuthError::InvalidToken(_) => {
                ServiceError::Unauthorized(format!("{e} (code {code})"))
            }
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
                ServiceError::Db(format!("{e} (code {code})"))
            }
        }
    }
}
