//! Ordered fallback chains for the aggregator endpoints.
//!
//! Re-exports the chain and the source trait so providers and handlers can
//! depend on this module directly.

pub mod chain;

pub use chain::{FallbackChain, Resolved, Source, DEFAULT_SOURCE};
