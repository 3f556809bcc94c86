//! folio gateway library entry.
//!
//! This crate wires config, the counter store, upstream sources, fallback
//! chains, and handlers into the HTTP service behind the portfolio widgets.
//! It is consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod counter;
pub mod fallback;
pub mod handlers;
pub mod obs;
pub mod ops;
pub mod providers;
pub mod router;
