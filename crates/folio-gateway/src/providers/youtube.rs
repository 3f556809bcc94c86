use async_trait::async_trait;

use folio_core::error::{FolioError, Result};
use folio_core::model::VideoDescriptor;
use folio_core::upstream::youtube::{PlaylistResponse, SOURCE};

use super::{fetch_json, VideoQuery};
use crate::config::YoutubeSection;
use crate::fallback::Source;

/// Recent playlist items, reduced to one "currently learning" pick.
pub struct YoutubeSource {
    http: reqwest::Client,
    base_url: String,
    max_results: u32,
    keywords: Vec<String>,
    recency: chrono::Duration,
    api_key: Option<String>,
    playlist_id: Option<String>,
}

impl YoutubeSource {
    pub fn new(
        http: reqwest::Client,
        cfg: &YoutubeSection,
        api_key: Option<String>,
        playlist_id: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url: cfg.api_url.trim_end_matches('/').to_string(),
            max_results: cfg.max_results,
            keywords: cfg.keywords.clone(),
            recency: cfg.recency(),
            api_key,
            playlist_id,
        }
    }
}

#[async_trait]
impl Source<VideoQuery, VideoDescriptor> for YoutubeSource {
    fn name(&self) -> &'static str {
        SOURCE
    }

    async fn fetch(&self, query: &VideoQuery) -> Result<VideoDescriptor> {
        let (key, playlist) = match (self.api_key.as_deref(), self.playlist_id.as_deref()) {
            (Some(k), Some(p)) => (k, p),
            _ => return Err(FolioError::NotConfigured("YOUTUBE_API_KEY/YOUTUBE_PLAYLIST_ID")),
        };

        let max_results = self.max_results.to_string();
        let req = self
            .http
            .get(format!("{}/playlistItems", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("playlistId", playlist),
                ("maxResults", max_results.as_str()),
                ("key", key),
            ]);

        let resp: PlaylistResponse = fetch_json(SOURCE, req).await?;
        resp.into_descriptor(query.now, &self.keywords, self.recency)
    }
}
