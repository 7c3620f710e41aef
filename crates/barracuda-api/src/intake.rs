//! Public lead-intake handler.
//!
//! The only unauthenticated write in the system. Reads of submitted leads
//! all live behind the auth gate under `/api/admin/contacts`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use barracuda_core::{contact::NewContact, store::ContactStore};
use serde_json::json;

use crate::{
  AppState,
  error::{ApiError, store_error},
  extract::ApiJson,
};

/// `POST /api/contact` — validate, normalise, and store a submission.
/// Returns 201 with the new id and timestamp.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<NewContact>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let input = body.validate()?;

  let contact = state.contacts.append(input).await.map_err(store_error)?;

  // Operational visibility only — not a durability or notification
  // guarantee.
  tracing::info!(
    id = contact.id,
    email = %contact.email,
    contact_type = %contact.contact_type,
    "new contact submission"
  );

  Ok((
    StatusCode::CREATED,
    Json(json!({
      "success": true,
      "message": "Thank you for your interest! Our team will contact you within 24 hours.",
      "data": {
        "contactId": contact.id,
        "submittedAt": contact.created_at,
      },
    })),
  ))
}
