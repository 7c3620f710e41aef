//! REST API for the Barracuda affiliate-network lead pipeline.
//!
//! Exposes an axum [`Router`] backed by any
//! [`barracuda_core::store::ContactStore`]. The public surface is
//! write-only (lead submission); every read or mutation of stored leads,
//! settings, or admin accounts sits behind the bearer-token auth gate.

pub mod auth;
pub mod contacts;
pub mod error;
pub mod extract;
pub mod intake;
pub mod settings;
pub mod token;

pub use error::ApiError;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post, put},
};
use barracuda_core::{
  memory::{AdminDirectory, SettingsStore},
  store::ContactStore,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use token::TokenKeys;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `BARRACUDA_*` environment overrides. Every field has a default so the
/// server runs out of the box.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "defaults::host")]
  pub host:                String,
  #[serde(default = "defaults::port")]
  pub port:                u16,
  /// HS256 secret for access tokens. Change in production.
  #[serde(default = "defaults::jwt_secret")]
  pub jwt_secret:          String,
  /// The one super_admin account created at startup.
  #[serde(default = "defaults::seed_admin_email")]
  pub seed_admin_email:    String,
  #[serde(default = "defaults::seed_admin_password")]
  pub seed_admin_password: String,
  #[serde(default = "defaults::seed_admin_name")]
  pub seed_admin_name:     String,
}

mod defaults {
  pub fn host() -> String {
    "127.0.0.1".to_string()
  }
  pub fn port() -> u16 {
    5000
  }
  pub fn jwt_secret() -> String {
    "affiiate-admin-secret-key-change-in-production".to_string()
  }
  pub fn seed_admin_email() -> String {
    "admin@affiiate.com".to_string()
  }
  pub fn seed_admin_password() -> String {
    "admin123".to_string()
  }
  pub fn seed_admin_name() -> String {
    "Super Admin".to_string()
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    ServerConfig {
      host:                defaults::host(),
      port:                defaults::port(),
      jwt_secret:          defaults::jwt_secret(),
      seed_admin_email:    defaults::seed_admin_email(),
      seed_admin_password: defaults::seed_admin_password(),
      seed_admin_name:     defaults::seed_admin_name(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers. Constructed once at
/// process start — there are no module-level globals, so every test builds
/// its own fresh state.
pub struct AppState<S> {
  pub contacts: Arc<S>,
  pub admins:   Arc<AdminDirectory>,
  pub settings: Arc<SettingsStore>,
  pub keys:     Arc<TokenKeys>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    AppState {
      contacts: Arc::clone(&self.contacts),
      admins:   Arc::clone(&self.admins),
      settings: Arc::clone(&self.settings),
      keys:     Arc::clone(&self.keys),
    }
  }
}

impl<S> AppState<S> {
  pub fn new(contacts: S, jwt_secret: &str) -> Self {
    AppState {
      contacts: Arc::new(contacts),
      admins:   Arc::new(AdminDirectory::new()),
      settings: Arc::new(SettingsStore::new()),
      keys:     Arc::new(TokenKeys::new(jwt_secret)),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router.
///
/// | Method & path | Auth |
/// |---|---|
/// | `POST /api/contact` | none |
/// | `POST /api/auth/login`, `POST /api/auth/register` | none |
/// | `GET /api/auth/me`, `PUT /api/auth/password` | bearer |
/// | `GET /api/auth/admins` | bearer, super_admin |
/// | `GET /api/admin/contacts[/stats]` | bearer |
/// | `GET`/`PUT`/`DELETE /api/admin/contacts/{id}` | bearer |
/// | `POST /api/admin/contacts/export` | bearer |
/// | `GET`/`PUT /api/admin/settings`, `/dashboard`, `/reset` | bearer |
/// | `GET /api/health` | none |
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ContactStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/api/health", get(health))
    .route("/api/contact", post(intake::submit::<S>))
    .route("/api/auth/login", post(auth::login::<S>))
    .route("/api/auth/register", post(auth::register::<S>))
    .route("/api/auth/me", get(auth::me::<S>))
    .route("/api/auth/password", put(auth::change_password::<S>))
    .route("/api/auth/admins", get(auth::list_admins::<S>))
    .route("/api/admin/contacts", get(contacts::list::<S>))
    .route("/api/admin/contacts/stats", get(contacts::stats::<S>))
    .route("/api/admin/contacts/export", post(contacts::export::<S>))
    .route(
      "/api/admin/contacts/{id}",
      get(contacts::get_one::<S>)
        .put(contacts::update::<S>)
        .delete(contacts::delete::<S>),
    )
    .route(
      "/api/admin/settings",
      get(settings::get_settings::<S>).put(settings::update_settings::<S>),
    )
    .route("/api/admin/settings/dashboard", get(settings::dashboard::<S>))
    .route("/api/admin/settings/reset", post(settings::reset::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// `GET /api/health`
async fn health() -> Json<serde_json::Value> {
  Json(json!({ "status": "ok", "timestamp": Utc::now() }))
}

#[cfg(test)]
mod tests;
