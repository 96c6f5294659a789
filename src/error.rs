//! Typed errors and their envelope mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::MessageBody;

/// Closed set of failure kinds surfaced by the store and handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} is required")]
    RequiredField(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    /// Stable kind tag, used in logs and asserted on in tests.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::RequiredField(_) => "required_field",
            AppError::Validation(_) => "validation",
            AppError::Conflict(_) => "conflict",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Db(_) => "database",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // API contract: failures ride the JSON envelope, the transport stays 200.
        // Unexpected database errors still get a log line before they are flattened.
        if let AppError::Db(e) = &self {
            tracing::error!(error = %e, "store failure");
        } else {
            tracing::debug!(kind = self.kind(), message = %self, "request rejected");
        }
        (StatusCode::OK, Json(MessageBody::error(self.to_string()))).into_response()
    }
}
