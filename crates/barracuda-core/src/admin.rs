//! Admin-user records for the triage dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dashboard role. `SuperAdmin` additionally unlocks admin-listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
  Admin,
  SuperAdmin,
}

/// An admin account. The password hash is a PHC string and is never
/// serialized — every read API returns the record without it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
  pub id:            u64,
  /// Unique, compared case-insensitively.
  pub email:         String,
  #[serde(skip)]
  pub password_hash: String,
  pub name:          String,
  pub role:          AdminRole,
  pub created_at:    DateTime<Utc>,
  /// Set on each successful login; `None` until the first one.
  pub last_login:    Option<DateTime<Utc>>,
}

/// Input for creating an admin (seeding or registration). The caller hashes
/// the password; the directory assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewAdmin {
  pub email:         String,
  pub password_hash: String,
  pub name:          String,
  pub role:          AdminRole,
}
