use async_trait::async_trait;

use folio_core::error::Result;
use folio_core::model::ContributionCalendar;
use folio_core::upstream::contrib_api::{ContribApiResponse, SOURCE};

use super::{fetch_json, CalendarQuery};
use crate::fallback::Source;

/// Secondary calendar source: public contributions API, no credentials.
pub struct ContributionsApiSource {
    http: reqwest::Client,
    base_url: String,
    username: String,
}

impl ContributionsApiSource {
    pub fn new(http: reqwest::Client, base_url: String, username: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
        }
    }
}

#[async_trait]
impl Source<CalendarQuery, ContributionCalendar> for ContributionsApiSource {
    fn name(&self) -> &'static str {
        SOURCE
    }

    async fn fetch(&self, query: &CalendarQuery) -> Result<ContributionCalendar> {
        let req = self
            .http
            .get(format!("{}/{}", self.base_url, self.username))
            .query(&[("y", query.year.to_string())]);

        let resp: ContribApiResponse = fetch_json(SOURCE, req).await?;
        resp.into_calendar(query.year)
    }
}
