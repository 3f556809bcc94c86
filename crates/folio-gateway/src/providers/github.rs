use async_trait::async_trait;

use folio_core::error::{FolioError, Result};
use folio_core::model::ContributionCalendar;
use folio_core::upstream::github::{calendar_request, GraphQlResponse, SOURCE};

use super::{fetch_json, CalendarQuery};
use crate::fallback::Source;

/// Primary calendar source: authenticated GitHub GraphQL.
pub struct GithubGraphQlSource {
    http: reqwest::Client,
    url: String,
    username: String,
    token: Option<String>,
}

impl GithubGraphQlSource {
    pub fn new(http: reqwest::Client, url: String, username: String, token: Option<String>) -> Self {
        Self {
            http,
            url,
            username,
            token,
        }
    }
}

#[async_trait]
impl Source<CalendarQuery, ContributionCalendar> for GithubGraphQlSource {
    fn name(&self) -> &'static str {
        SOURCE
    }

    async fn fetch(&self, query: &CalendarQuery) -> Result<ContributionCalendar> {
        let token = self
            .token
            .as_deref()
            .ok_or(FolioError::NotConfigured("GITHUB_TOKEN"))?;

        let req = self
            .http
            .post(self.url.as_str())
            .bearer_auth(token)
            .json(&calendar_request(&self.username, query.year));

        let resp: GraphQlResponse = fetch_json(SOURCE, req).await?;
        resp.into_calendar(query.year)
    }
}
