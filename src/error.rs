//! Typed errors, failure classification and HTTP mapping.

use crate::response::MessageBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Input rejected by the service layer's semantic checks.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// The store or another dependency failed.
    #[error("{0}")]
    ExternalService(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    /// Request shape rejected by a handler before any service call.
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unclassified(String),
}

/// Response class of a failure. Each class maps to exactly one status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    BadRequest,
    NotFound,
    InternalError,
}

impl ErrorClass {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorClass::BadRequest => StatusCode::BAD_REQUEST,
            ErrorClass::NotFound => StatusCode::NOT_FOUND,
            ErrorClass::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub fn classify(err: &AppError) -> ErrorClass {
    match err {
        AppError::Validation(_) | AppError::BadRequest(_) => ErrorClass::BadRequest,
        AppError::NotFound(_) => ErrorClass::NotFound,
        AppError::Db(sqlx::Error::RowNotFound) => ErrorClass::NotFound,
        AppError::Db(_)
        | AppError::ExternalService(_)
        | AppError::Unclassified(_)
        | AppError::Config(_) => ErrorClass::InternalError,
    }
}

impl AppError {
    /// Collapse any failure into the catch-all used by listing endpoints.
    pub fn into_unclassified(self) -> AppError {
        match self {
            AppError::Unclassified(_) => self,
            other => AppError::Unclassified(other.to_string()),
        }
    }

    /// Log a failed operation with the severity of its class. Handler
    /// preconditions (`BadRequest`) are answered without a log line.
    pub fn log_failure(&self, resource: &str, action: &str, id: Option<i32>) {
        if matches!(self, AppError::BadRequest(_)) {
            return;
        }
        match classify(self) {
            ErrorClass::BadRequest => {
                tracing::warn!(resource, action, id, error = %self, "validation failed")
            }
            ErrorClass::NotFound => {
                tracing::info!(resource, action, id, error = %self, "not found")
            }
            ErrorClass::InternalError => {
                tracing::error!(resource, action, id, error = %self, "operation failed")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = classify(&self).status();
        (status, Json(MessageBody::new(self.to_string()))).into_response()
    }
}
