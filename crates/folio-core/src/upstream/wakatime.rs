//! WakaTime daily summaries folded into the coding widget.

use std::cmp::Ordering;

use chrono::{Duration, NaiveDate};
use serde::Deserialize;

use crate::error::{FolioError, Result};
use crate::model::coding::format_hours;
use crate::model::{CodingSummary, LanguageShare};

pub const SOURCE: &str = "wakatime";

/// Languages shown on the widget.
pub const TOP_LANGUAGES: usize = 3;

/// `(start, end)` dates for a window of `days` ending today.
pub fn summary_window(today: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(i64::from(days)), today)
}

#[derive(Debug, Deserialize)]
pub struct SummariesResponse {
    #[serde(default)]
    pub data: Vec<DaySummary>,
}

#[derive(Debug, Deserialize)]
pub struct DaySummary {
    #[serde(default)]
    pub grand_total: Option<GrandTotal>,
    #[serde(default)]
    pub languages: Vec<LanguageStat>,
}

#[derive(Debug, Deserialize)]
pub struct GrandTotal {
    #[serde(default)]
    pub total_seconds: f64,
}

#[derive(Debug, Deserialize)]
pub struct LanguageStat {
    pub name: String,
    #[serde(default)]
    pub percent: f64,
    #[serde(default)]
    pub total_seconds: f64,
}

impl SummariesResponse {
    /// Fold the window into the widget payload.
    ///
    /// An empty `data` array is an error; a window with zero seconds is not,
    /// it produces the inactive summary.
    pub fn into_summary(self) -> Result<CodingSummary> {
        if self.data.is_empty() {
            return Err(FolioError::EmptyResult(SOURCE));
        }

        let total_seconds: f64 = self
            .data
            .iter()
            .filter_map(|d| d.grand_total.as_ref())
            .map(|g| g.total_seconds.max(0.0))
            .sum();
        let total_seconds = total_seconds.floor() as u64;

        let top_languages = if total_seconds == 0 {
            Vec::new()
        } else {
            top_languages(&self.data)
        };

        Ok(CodingSummary {
            is_active: total_seconds > 0,
            hours: format_hours(total_seconds),
            top_languages,
        })
    }
}

fn top_languages(days: &[DaySummary]) -> Vec<LanguageShare> {
    let mut merged: Vec<(String, f64)> = if let [only] = days {
        only.languages
            .iter()
            .map(|l| (l.name.clone(), l.percent))
            .collect()
    } else {
        let mut seconds: Vec<(String, f64)> = Vec::new();
        for lang in days.iter().flat_map(|d| d.languages.iter()) {
            match seconds.iter_mut().find(|(name, _)| *name == lang.name) {
                Some((_, s)) => *s += lang.total_seconds.max(0.0),
                None => seconds.push((lang.name.clone(), lang.total_seconds.max(0.0))),
            }
        }
        let all: f64 = seconds.iter().map(|(_, s)| s).sum();
        if all <= 0.0 {
            return Vec::new();
        }
        seconds
            .into_iter()
            .map(|(name, s)| (name, s * 100.0 / all))
            .collect()
    };

    // stable: equal shares keep provider order
    merged.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    merged
        .into_iter()
        .take(TOP_LANGUAGES)
        .map(|(name, percent)| LanguageShare {
            name,
            percent: percent.round().max(0.0) as u32,
        })
        .collect()
}
