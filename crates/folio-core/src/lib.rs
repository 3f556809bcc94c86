//! folio core: transport-agnostic response models, upstream wire shapes, and errors.
//!
//! This crate defines the JSON contracts served by the gateway and the pure
//! normalization/selection logic applied to upstream payloads. It carries no
//! HTTP or runtime dependencies so the logic can be tested from fixtures alone.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed upstream
//! data surfaces as `FolioError` and the gateway turns it into fallback data.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;
pub mod upstream;

/// Shared result type.
pub use error::{FolioError, Result};
