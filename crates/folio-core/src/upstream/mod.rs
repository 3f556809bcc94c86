//! Upstream wire shapes and their normalization.
//!
//! Each submodule owns one provider: the serde shapes of its reply and the
//! pure functions turning that reply into a `model` type. Network access lives
//! in the gateway; everything here is testable from recorded payloads.

pub mod contrib_api;
pub mod github;
pub mod wakatime;
pub mod youtube;
