//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure leaves the API as a `{"status": ..., "message": ...}` body.
//! Storage details are logged and replaced by a generic message.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use pawlog_core::ValidationError;
use serde_json::json;
use thiserror::Error;

/// Message shown in place of any storage failure.
pub const STORAGE_FAILURE_MESSAGE: &str =
  "The entry store could not complete the request. Please try again.";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  /// The request could not be decoded at all.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("{0}")]
  Conflict(String),

  #[error("{0}")]
  NotFound(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<pawlog_core::Error> for ApiError {
  fn from(err: pawlog_core::Error) -> Self {
    match err {
      pawlog_core::Error::Validation(e) => Self::Validation(e),
      e @ pawlog_core::Error::Conflict { .. } => Self::Conflict(e.to_string()),
      pawlog_core::Error::Storage(e) => Self::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, label, message) = match &self {
      ApiError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, "error", e.to_string()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, "error", m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, "error", m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "storage failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "error", STORAGE_FAILURE_MESSAGE.to_owned())
      }
    };
    (status, Json(json!({ "status": label, "message": message }))).into_response()
  }
}
