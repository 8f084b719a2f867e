use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::nutrition::lookup::LookupError;

/// The one outcome type shared by every service operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("nutrient lookup failed, record not saved: {0}")]
    LookupFailed(String),

    #[error("nutrient lookup returned unreadable data: {0}")]
    LookupParse(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<LookupError> for ServiceError {
    fn from(e: LookupError) -> Self {
        if e.is_parse_error() {
            ServiceError::LookupParse(e.to_string())
        } else {
            ServiceError::LookupFailed(e.to_string())
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        ServiceError::Validation(rejection.body_text())
    }
}

impl ServiceError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServiceError::AlreadyExists(_) => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ServiceError::LookupFailed(_) => (StatusCode::BAD_GATEWAY, "LOOKUP_FAILED"),
            ServiceError::LookupParse(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "LOOKUP_PARSE_ERROR")
            }
            ServiceError::Database(e) if is_unique_violation(e) => {
                (StatusCode::CONFLICT, "ALREADY_EXISTS")
            }
            ServiceError::Database(_) | ServiceError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            // usernames are the only UNIQUE column
            ServiceError::Database(e) if is_unique_violation(e) => {
                ServiceError::AlreadyExists("username".into()).to_string()
            }
            ServiceError::Database(_) | ServiceError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
