//! usage-core: transport-agnostic tracking primitives and error types.
//!
//! This crate defines the payload contract accepted on the tracking route,
//! the label key that buckets counts, and the error surface shared with the
//! gateway. It carries no HTTP or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `UsageError`/`Result` so the service
//! does not crash on malformed input.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{Result, UsageError};
pub use protocol::track::{LabelKey, TrackRequest};
