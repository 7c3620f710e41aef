//! The `ContactStore` trait.
//!
//! The trait is implemented by storage backends (currently
//! [`MemoryStore`](crate::memory::MemoryStore)). The API layer depends on
//! this abstraction, not on any concrete backend, so the in-memory store can
//! later be swapped for real persistence without touching the handlers.

use std::future::Future;

use crate::contact::{Contact, ContactPatch, NewContact};

/// Abstraction over a lead store backend.
///
/// Implementations assign ids from a counter that is monotonic for the
/// process lifetime — an id is never reused, even after the record it
/// belonged to has been deleted.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store a validated submission. The store assigns the id, stamps
  /// `created_at` and defaults the status to `new`.
  fn append(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// All leads in insertion order.
  fn all(
    &self,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Retrieve a lead by id. Returns `None` if not found.
  fn by_id(
    &self,
    id: u64,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Case-insensitive exact match on the stored (normalised) email.
  fn by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + 'a;

  /// Apply a triage patch; fields absent from the patch are left unchanged.
  /// Stamps `updated_at`. Returns the updated lead, or `None` if not found.
  fn update(
    &self,
    id: u64,
    patch: ContactPatch,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Remove a lead permanently. Returns `false` if the id was unknown, so a
  /// second delete of the same id is an idempotent failure.
  fn delete(
    &self,
    id: u64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
