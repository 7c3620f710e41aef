//! Auth gate — bearer-token extractor, password hashing, and the
//! `/api/auth` handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/auth/login` | Generic failure message, no user-existence leak |
//! | `POST` | `/api/auth/register` | Creates a regular `admin`; min-8 password |
//! | `GET`  | `/api/auth/me` | Current admin profile |
//! | `PUT`  | `/api/auth/password` | Re-verifies the current password first |
//! | `GET`  | `/api/auth/admins` | super_admin only |

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{StatusCode, header, request::Parts},
  response::IntoResponse,
};
use barracuda_core::{
  admin::{AdminRole, NewAdmin},
  store::ContactStore,
};
use rand_core::OsRng;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError, extract::ApiJson, token::Claims};

// ─── Password hashing ────────────────────────────────────────────────────────

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(e.to_string().into()))
}

/// Constant-work verification against a stored PHC string. Any parse or
/// verification failure is simply "no match".
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(stored_hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Bearer extractor ────────────────────────────────────────────────────────

/// Present in a handler's signature means the request carried a valid,
/// non-expired bearer token; the claims are available for role checks.
#[derive(Debug)]
pub struct AuthAdmin {
  pub claims: Claims,
}

impl AuthAdmin {
  /// Role-based authorization: the claims' role must be in `allowed`.
  pub fn authorize(&self, allowed: &[AdminRole]) -> Result<(), ApiError> {
    if allowed.contains(&self.claims.role) {
      Ok(())
    } else {
      Err(ApiError::Forbidden("Insufficient permissions".to_string()))
    }
  }
}

impl<S> FromRequestParts<AppState<S>> for AuthAdmin
where
  S: ContactStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let header_val = parts
      .headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or_else(|| {
        ApiError::Unauthorized("Access token required".to_string())
      })?;

    let token = header_val.strip_prefix("Bearer ").ok_or_else(|| {
      ApiError::Unauthorized("Access token required".to_string())
    })?;

    let claims = state
      .keys
      .verify(token)
      .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    Ok(AuthAdmin { claims })
  }
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
}

/// `POST /api/auth/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<LoginBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore,
{
  if body.email.trim().is_empty() || body.password.is_empty() {
    return Err(ApiError::Validation(
      "Email and password are required".to_string(),
    ));
  }

  // Absent account and wrong password are indistinguishable to the caller.
  let unauthorized =
    || ApiError::Unauthorized("Invalid email or password".to_string());

  let admin = state
    .admins
    .by_email(&body.email)
    .await
    .ok_or_else(unauthorized)?;

  if !verify_password(&body.password, &admin.password_hash) {
    return Err(unauthorized());
  }

  let admin = state.admins.record_login(admin.id).await?;
  let token = state
    .keys
    .sign(&admin)
    .map_err(|e| ApiError::Internal(Box::new(e)))?;

  tracing::info!(admin = %admin.email, "admin logged in");

  Ok(Json(json!({
    "success": true,
    "message": "Login successful",
    "data": { "user": admin, "token": token },
  })))
}

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
  #[serde(default)]
  pub name:     String,
}

/// `POST /api/auth/register` — creates a regular `admin` account.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
{
  if body.email.trim().is_empty()
    || body.password.is_empty()
    || body.name.trim().is_empty()
  {
    return Err(ApiError::Validation(
      "Email, password, and name are required".to_string(),
    ));
  }

  if state.admins.by_email(&body.email).await.is_some() {
    return Err(barracuda_core::Error::EmailTaken.into());
  }

  if body.password.len() < 8 {
    return Err(barracuda_core::Error::WeakPassword.into());
  }

  let admin = state
    .admins
    .create(NewAdmin {
      email:         body.email,
      password_hash: hash_password(&body.password)?,
      name:          body.name,
      role:          AdminRole::Admin,
    })
    .await?;

  let token = state
    .keys
    .sign(&admin)
    .map_err(|e| ApiError::Internal(Box::new(e)))?;

  Ok((
    StatusCode::CREATED,
    Json(json!({
      "success": true,
      "message": "Admin registered successfully",
      "data": { "user": admin, "token": token },
    })),
  ))
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// `GET /api/auth/me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  auth: AuthAdmin,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore,
{
  let admin = state
    .admins
    .by_id(auth.claims.sub)
    .await
    .ok_or(barracuda_core::Error::AdminNotFound(auth.claims.sub))?;

  Ok(Json(json!({ "success": true, "data": admin })))
}

// ─── Password change ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordBody {
  #[serde(default)]
  pub current_password: String,
  #[serde(default)]
  pub new_password:     String,
}

/// `PUT /api/auth/password` — re-verifies the current password before
/// accepting the new one.
pub async fn change_password<S>(
  State(state): State<AppState<S>>,
  auth: AuthAdmin,
  ApiJson(body): ApiJson<ChangePasswordBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore,
{
  if body.current_password.is_empty() || body.new_password.is_empty() {
    return Err(ApiError::Validation(
      "Current and new password are required".to_string(),
    ));
  }

  if body.new_password.len() < 8 {
    return Err(barracuda_core::Error::WeakPassword.into());
  }

  let admin = state
    .admins
    .by_id(auth.claims.sub)
    .await
    .ok_or(barracuda_core::Error::AdminNotFound(auth.claims.sub))?;

  if !verify_password(&body.current_password, &admin.password_hash) {
    return Err(ApiError::Unauthorized(
      "Current password is incorrect".to_string(),
    ));
  }

  state
    .admins
    .set_password_hash(admin.id, hash_password(&body.new_password)?)
    .await?;

  Ok(Json(json!({
    "success": true,
    "message": "Password updated successfully",
  })))
}

// ─── Admin listing ───────────────────────────────────────────────────────────

/// `GET /api/auth/admins` — super_admin only. Serialization never includes
/// password hashes.
pub async fn list_admins<S>(
  State(state): State<AppState<S>>,
  auth: AuthAdmin,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore,
{
  auth.authorize(&[AdminRole::SuperAdmin])?;

  let admins = state.admins.all().await;
  Ok(Json(json!({
    "success": true,
    "data": admins,
    "total": admins.len(),
  })))
}
