//! Unauthenticated contributions API (secondary calendar source).
//!
//! Its payload already matches the served shape, but counts and levels are
//! trusted no further than the clamp.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{FolioError, Result};
use crate::model::{ContributionCalendar, ContributionDay};

pub const SOURCE: &str = "contributions_api";

#[derive(Debug, Deserialize)]
pub struct ContribApiResponse {
    #[serde(default)]
    pub total: BTreeMap<String, i64>,
    #[serde(default)]
    pub contributions: Vec<ContribApiDay>,
}

#[derive(Debug, Deserialize)]
pub struct ContribApiDay {
    pub date: chrono::NaiveDate,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub level: i64,
}

impl ContribApiResponse {
    pub fn into_calendar(self, year: i32) -> Result<ContributionCalendar> {
        if self.contributions.is_empty() {
            return Err(FolioError::EmptyResult(SOURCE));
        }

        let contributions: Vec<ContributionDay> = self
            .contributions
            .into_iter()
            .map(|d| ContributionDay::clamped(d.date, d.count, d.level))
            .collect();

        let total = match self.total.get(&year.to_string()) {
            Some(t) => (*t).max(0) as u64,
            None => contributions.iter().map(|d| d.count).sum(),
        };

        Ok(ContributionCalendar::new(year, total, contributions))
    }
}
