//! Lead types — contact-form submissions and their triage lifecycle.
//!
//! A [`Contact`] is created once by the public intake endpoint and from then
//! on only mutated by triage (status, notes, assignment). Deletion is
//! explicit and permanent; there is no soft-delete.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Triage status of a lead. New submissions always start as `New`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
  #[default]
  New,
  Contacted,
  Qualified,
  Rejected,
}

impl LeadStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      LeadStatus::New => "new",
      LeadStatus::Contacted => "contacted",
      LeadStatus::Qualified => "qualified",
      LeadStatus::Rejected => "rejected",
    }
  }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A stored lead. Ids are assigned by the store from a monotonic counter and
/// are never reused, even after deletions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  pub id:           u64,
  pub name:         String,
  pub email:        String,
  pub company:      String,
  /// Accepted as submitted — `publisher` and `advertiser` are the values the
  /// form offers, but the server does not enforce an enumeration.
  #[serde(rename = "type")]
  pub contact_type: String,
  pub messenger:    Option<String>,
  pub username:     Option<String>,
  pub message:      Option<String>,
  pub status:       LeadStatus,
  pub notes:        Option<String>,
  pub assigned_to:  Option<String>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   Option<DateTime<Utc>>,
}

// ─── Intake input ─────────────────────────────────────────────────────────────

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex")
});

/// Raw contact-form input. Required fields default to empty strings so that
/// an absent field and a blank field fail validation identically.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
  #[serde(default)]
  pub name:         String,
  #[serde(default)]
  pub email:        String,
  #[serde(default)]
  pub company:      String,
  #[serde(default, rename = "type")]
  pub contact_type: String,
  pub messenger:    Option<String>,
  pub username:     Option<String>,
  pub message:      Option<String>,
}

impl NewContact {
  /// Validate and normalise the submission. First failure wins: required
  /// fields are checked in declaration order, then the email pattern.
  ///
  /// Normalisation: `name`/`company`/`message` are trimmed, `email` is
  /// trimmed and lower-cased, and blank optional fields become `None`.
  pub fn validate(mut self) -> Result<Self> {
    self.name = self.name.trim().to_string();
    self.email = self.email.trim().to_lowercase();
    self.company = self.company.trim().to_string();
    self.contact_type = self.contact_type.trim().to_string();

    if self.name.is_empty() {
      return Err(Error::MissingField("name"));
    }
    if self.email.is_empty() {
      return Err(Error::MissingField("email"));
    }
    if self.company.is_empty() {
      return Err(Error::MissingField("company"));
    }
    if self.contact_type.is_empty() {
      return Err(Error::MissingField("type"));
    }

    if !EMAIL_RE.is_match(&self.email) {
      return Err(Error::InvalidEmail);
    }

    self.messenger = none_if_blank(self.messenger);
    self.username = none_if_blank(self.username);
    self.message = none_if_blank(self.message.map(|m| m.trim().to_string()));

    Ok(self)
  }
}

fn none_if_blank(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// Triage edit. Only fields present in the request are applied — absence
/// means "leave unchanged", so an explicit empty string is a real update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
  pub status:      Option<LeadStatus>,
  pub notes:       Option<String>,
  pub assigned_to: Option<String>,
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Triage list/export filter. All constraints are optional and AND-combined,
/// so applying them in any order yields the same result set.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
  pub contact_type: Option<String>,
  pub status:       Option<LeadStatus>,
  /// Case-insensitive substring match against name OR email OR company.
  pub search:       Option<String>,
  /// Inclusive lower bound on `created_at`.
  pub start_date:   Option<DateTime<Utc>>,
  /// Inclusive upper bound on `created_at`.
  pub end_date:     Option<DateTime<Utc>>,
}

impl ContactFilter {
  pub fn matches(&self, contact: &Contact) -> bool {
    if let Some(t) = &self.contact_type
      && contact.contact_type != *t
    {
      return false;
    }
    if let Some(s) = self.status
      && contact.status != s
    {
      return false;
    }
    if let Some(q) = &self.search {
      let q = q.to_lowercase();
      let hit = contact.name.to_lowercase().contains(&q)
        || contact.email.to_lowercase().contains(&q)
        || contact.company.to_lowercase().contains(&q);
      if !hit {
        return false;
      }
    }
    if let Some(start) = self.start_date
      && contact.created_at < start
    {
      return false;
    }
    if let Some(end) = self.end_date
      && contact.created_at > end
    {
      return false;
    }
    true
  }
}
