//! Response models served by the gateway.
//!
//! Field names follow the JSON the portfolio frontend already consumes
//! (`camelCase` where the widgets expect it).

pub mod coding;
pub mod contributions;
pub mod counter;
pub mod video;

pub use coding::{CodingSummary, LanguageShare};
pub use contributions::{ContributionCalendar, ContributionDay, MAX_LEVEL};
pub use counter::CountReply;
pub use video::VideoDescriptor;
