//! Settings and dashboard handlers for `/api/admin/settings`.

use axum::{Json, extract::State};
use barracuda_core::{
  contact::LeadStatus, settings::SettingsUpdate, store::ContactStore,
};
use serde_json::json;

use crate::{
  AppState,
  auth::AuthAdmin,
  contacts::month_start,
  error::{ApiError, store_error},
  extract::ApiJson,
};

/// `GET /api/admin/settings`
pub async fn get_settings<S>(
  State(state): State<AppState<S>>,
  _auth: AuthAdmin,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore,
{
  let settings = state.settings.get().await;
  Ok(Json(json!({ "success": true, "data": settings })))
}

/// `PUT /api/admin/settings` — merge-update. Recognised top-level fields are
/// applied; everything else in the body is ignored.
pub async fn update_settings<S>(
  State(state): State<AppState<S>>,
  _auth: AuthAdmin,
  ApiJson(update): ApiJson<SettingsUpdate>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore,
{
  let settings = state.settings.merge(update).await;
  Ok(Json(json!({
    "success": true,
    "message": "Settings updated successfully",
    "data": settings,
  })))
}

/// `GET /api/admin/settings/dashboard` — site identity plus a live snapshot
/// of contact counts for the operator landing page.
pub async fn dashboard<S>(
  State(state): State<AppState<S>>,
  _auth: AuthAdmin,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let settings = state.settings.get().await;
  let contacts = state.contacts.all().await.map_err(store_error)?;

  let month = month_start();
  let this_month = contacts.iter().filter(|c| c.created_at >= month).count();
  let publishers = contacts
    .iter()
    .filter(|c| c.contact_type == "publisher")
    .count();
  let advertisers = contacts
    .iter()
    .filter(|c| c.contact_type == "advertiser")
    .count();
  let new = contacts
    .iter()
    .filter(|c| c.status == LeadStatus::New)
    .count();

  Ok(Json(json!({
    "success": true,
    "data": {
      "siteInfo": {
        "siteName":        settings.site_name,
        "companyName":     settings.company_name,
        "contactEmail":    settings.contact_email,
        "maintenanceMode": settings.maintenance_mode,
      },
      "quickStats": {
        "totalContacts": contacts.len(),
        "thisMonth":     this_month,
        "publishers":    publishers,
        "advertisers":   advertisers,
        "new":           new,
      },
    },
  })))
}

/// `POST /api/admin/settings/reset` — restore the compiled-in defaults.
pub async fn reset<S>(
  State(state): State<AppState<S>>,
  _auth: AuthAdmin,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore,
{
  let settings = state.settings.reset().await;
  Ok(Json(json!({
    "success": true,
    "message": "Settings reset to defaults",
    "data": settings,
  })))
}
