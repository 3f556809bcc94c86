use serde::{Deserialize, Serialize};

/// Progress shown for a live (non-fallback) pick.
pub const LIVE_PROGRESS: u8 = 45;

/// What the "currently learning" widget renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDescriptor {
    pub title: String,
    pub channel: String,
    pub thumbnail: String,
    pub link: String,
    pub published_at: String,
    pub progress: u8,
    pub watching: bool,
}

/// Watch URL for a video id.
pub fn watch_link(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}
