use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use folio_core::error::{FolioError, Result};
use folio_core::model::CodingSummary;
use folio_core::upstream::wakatime::{summary_window, SummariesResponse, SOURCE};

use super::{fetch_json, SummaryQuery};
use crate::fallback::Source;

/// Daily summaries for the current user, folded into the coding widget.
pub struct WakatimeSource {
    http: reqwest::Client,
    base_url: String,
    window_days: u32,
    api_key: Option<String>,
}

impl WakatimeSource {
    pub fn new(http: reqwest::Client, base_url: String, window_days: u32, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            window_days,
            api_key,
        }
    }
}

#[async_trait]
impl Source<SummaryQuery, CodingSummary> for WakatimeSource {
    fn name(&self) -> &'static str {
        SOURCE
    }

    async fn fetch(&self, query: &SummaryQuery) -> Result<CodingSummary> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(FolioError::NotConfigured("WAKATIME_API_KEY"))?;

        let (start, end) = summary_window(query.today, self.window_days);
        let req = self
            .http
            .get(format!("{}/users/current/summaries", self.base_url))
            .header(reqwest::header::AUTHORIZATION, format!("Basic {}", STANDARD.encode(key)))
            .query(&[
                ("start", start.format("%Y-%m-%d").to_string()),
                ("end", end.format("%Y-%m-%d").to_string()),
            ]);

        let resp: SummariesResponse = fetch_json(SOURCE, req).await?;
        resp.into_summary()
    }
}
