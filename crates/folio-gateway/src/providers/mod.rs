//! Upstream HTTP sources for the aggregator chains.
//!
//! Each source performs exactly one request and hands the body to the
//! matching `folio_core::upstream` normalizer.

pub mod contrib_api;
pub mod github;
pub mod wakatime;
pub mod youtube;

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;

use folio_core::error::{FolioError, Result};

use crate::config::UpstreamSection;

pub use contrib_api::ContributionsApiSource;
pub use github::GithubGraphQlSource;
pub use wakatime::WakatimeSource;
pub use youtube::YoutubeSource;

/// Calendar year requested by `/api/github-contributions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarQuery {
    pub year: i32,
}

/// Day the coding window ends on (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryQuery {
    pub today: NaiveDate,
}

/// Reference instant for the video recency override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoQuery {
    pub now: DateTime<Utc>,
}

/// Shared client for every upstream call; the timeout bounds each attempt.
pub fn build_http_client(cfg: &UpstreamSection) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(cfg.timeout_ms))
        .user_agent(cfg.user_agent.as_str())
        .build()
        .map_err(|e| FolioError::Internal(format!("http client build failed: {e}")))
}

/// Send, require 2xx, and decode the JSON body.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    source: &'static str,
    req: reqwest::RequestBuilder,
) -> Result<T> {
    let resp = req
        .send()
        .await
        .map_err(|e| FolioError::upstream(source, format!("request failed: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(200).collect();
        return Err(FolioError::upstream(source, format!("status {status}: {snippet}")));
    }

    resp.json::<T>()
        .await
        .map_err(|e| FolioError::upstream(source, format!("malformed payload: {e}")))
}
