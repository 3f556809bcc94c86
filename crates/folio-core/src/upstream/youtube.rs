//! YouTube playlist items and the "currently learning" pick.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::error::{FolioError, Result};
use crate::model::video::{watch_link, LIVE_PROGRESS};
use crate::model::VideoDescriptor;

pub const SOURCE: &str = "youtube";

/// Titles YouTube substitutes for entries the viewer cannot watch.
const HIDDEN_TITLES: [&str; 2] = ["Private video", "Deleted video"];

/// Educational/relevant content markers, matched as lowercase substrings.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    // formats
    "tutorial", "course", "learn", "guide", "lecture", "build", "demo",
    "explained", "introduction", "crash course", "how to", "walkthrough",
    "podcast", "breakdown", "analysis", "deep dive", "interview", "talk",
    "conference", "keynote", "workshop", "masterclass",
    // topics
    "coding", "programming", "system design", "architecture", "software",
    "engineering", "development", "web", "mobile", "app", "cloud", "devops",
    "backend", "frontend", "full stack", "ai", "ml", "data", "algorithm",
    // tech
    "react", "next.js", "node", "go", "rust", "java", "python", "css",
    "html", "javascript", "typescript", "aws", "docker", "kubernetes",
    "linux", "database", "sql", "nosql", "redis", "kafka",
];

#[derive(Debug, Deserialize)]
pub struct PlaylistResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    pub snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_title: Option<String>,
    #[serde(default)]
    pub video_owner_channel_title: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: Option<String>,
}

impl Snippet {
    fn video_id(&self) -> Option<&str> {
        self.resource_id.as_ref()?.video_id.as_deref()
    }

    fn published(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published_at)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }

    fn is_watchable(&self) -> bool {
        !HIDDEN_TITLES.contains(&self.title.as_str()) && self.video_id().is_some()
    }

    /// Case-insensitive substring match over title and description.
    pub fn matches_any<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        let text = format!("{} {}", self.title, self.description).to_lowercase();
        keywords
            .iter()
            .any(|k| text.contains(&k.as_ref().to_lowercase()))
    }

    pub fn to_descriptor(&self) -> VideoDescriptor {
        let thumbs = &self.thumbnails;
        let thumbnail = thumbs
            .medium
            .as_ref()
            .or(thumbs.high.as_ref())
            .or(thumbs.default.as_ref())
            .map(|t| t.url.clone())
            .unwrap_or_default();

        VideoDescriptor {
            title: self.title.clone(),
            channel: self
                .video_owner_channel_title
                .clone()
                .or_else(|| self.channel_title.clone())
                .unwrap_or_default(),
            thumbnail,
            link: watch_link(self.video_id().unwrap_or_default()),
            published_at: self.published_at.clone(),
            progress: LIVE_PROGRESS,
            watching: true,
        }
    }
}

/// Pick the item to show.
///
/// The newest watchable item wins outright when it is younger than `recency`.
/// Otherwise the first watchable item matching a keyword, in playlist order.
pub fn select_video<'a, S: AsRef<str>>(
    items: &'a [PlaylistItem],
    now: DateTime<Utc>,
    keywords: &[S],
    recency: Duration,
) -> Option<&'a Snippet> {
    let watchable = || {
        items
            .iter()
            .filter_map(|i| i.snippet.as_ref())
            .filter(|s| s.is_watchable())
    };

    let mut newest: Option<(&Snippet, DateTime<Utc>)> = None;
    for s in watchable() {
        if let Some(at) = s.published() {
            if newest.map_or(true, |(_, best)| at > best) {
                newest = Some((s, at));
            }
        }
    }
    if let Some((s, at)) = newest {
        if now.signed_duration_since(at) < recency {
            tracing::debug!(title = %s.title, "recent upload overrides keyword match");
            return Some(s);
        }
    }

    let picked = watchable().find(|s| s.matches_any(keywords));
    if picked.is_none() {
        tracing::debug!(items = items.len(), "no playlist item matches a keyword");
    }
    picked
}

impl PlaylistResponse {
    pub fn into_descriptor<S: AsRef<str>>(
        self,
        now: DateTime<Utc>,
        keywords: &[S],
        recency: Duration,
    ) -> Result<VideoDescriptor> {
        select_video(&self.items, now, keywords, recency)
            .map(Snippet::to_descriptor)
            .ok_or(FolioError::EmptyResult(SOURCE))
    }
}
