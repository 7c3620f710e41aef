//! Request extractors whose rejections use the JSON error envelope.
//!
//! Axum's stock [`Json`] and [`Query`] extractors reject with plain-text
//! responses (422 for bodies). Every failure this API emits is the
//! `{"success": false, "message": "..."}` envelope, so handlers take these
//! wrappers instead; a body or query string that fails to deserialize
//! becomes a 400 carrying the deserializer's message.

use axum::{
  Json,
  extract::{FromRequest, FromRequestParts, Query, Request},
  http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON body extractor; rejects as a 400 envelope.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state)
      .await
      .map_err(|e| ApiError::Validation(e.body_text()))?;
    Ok(ApiJson(value))
  }
}

/// Query-string extractor; rejects as a 400 envelope.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    let Query(value) = Query::<T>::from_request_parts(parts, state)
      .await
      .map_err(|e| ApiError::Validation(e.body_text()))?;
    Ok(ApiQuery(value))
  }
}
