//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure leaves the server as the uniform envelope
//! `{"success": false, "message": "..."}`. Internal faults are logged with
//! their detail and surface only a generic message.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  Unauthorized(String),

  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  NotFound(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<barracuda_core::Error> for ApiError {
  fn from(e: barracuda_core::Error) -> Self {
    use barracuda_core::Error as Core;
    match e {
      Core::MissingField(_)
      | Core::InvalidEmail
      | Core::EmailTaken
      | Core::WeakPassword => ApiError::Validation(e.to_string()),
      Core::ContactNotFound(_) | Core::AdminNotFound(_) => {
        ApiError::NotFound(e.to_string())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "internal error");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "Internal Server Error".to_string(),
        )
      }
    };
    (status, Json(json!({ "success": false, "message": message })))
      .into_response()
  }
}

/// Wrap a store-level error. The in-memory stores are infallible, but the
/// trait leaves room for fallible backends.
pub fn store_error<E>(e: E) -> ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  ApiError::Internal(Box::new(e))
}
