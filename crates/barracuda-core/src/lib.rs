//! Core types and trait definitions for the Barracuda lead pipeline.
//!
//! This crate is deliberately free of HTTP dependencies. It holds the
//! domain model (leads, admins, settings), intake validation, the
//! [`ContactStore`](store::ContactStore) trait and the in-memory store
//! implementations used by the server.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod admin;
pub mod contact;
pub mod error;
pub mod memory;
pub mod settings;
pub mod store;

pub use error::{Error, Result};
