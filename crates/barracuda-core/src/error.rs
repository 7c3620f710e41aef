//! Error types for `barracuda-core`.
//!
//! Display strings double as the user-facing messages in the API envelope,
//! so they are phrased for the form-filling public rather than for logs.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  /// A required intake field was absent or blank. Carries the field name
  /// for diagnostics; the message is deliberately generic.
  #[error("Please fill in all required fields")]
  MissingField(&'static str),

  #[error("Please provide a valid email address")]
  InvalidEmail,

  #[error("Email already registered")]
  EmailTaken,

  #[error("Password must be at least 8 characters")]
  WeakPassword,

  #[error("Contact not found")]
  ContactNotFound(u64),

  #[error("Admin not found")]
  AdminNotFound(u64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
