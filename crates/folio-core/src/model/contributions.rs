use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Highest level on the normalized 0..=4 scale.
pub const MAX_LEVEL: u8 = 4;

/// One cell of the contribution graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u64,
    pub level: u8,
}

impl ContributionDay {
    /// Build a day from loosely-typed upstream values, clamping into range.
    pub fn clamped(date: NaiveDate, count: i64, level: i64) -> Self {
        Self {
            date,
            count: count.max(0) as u64,
            level: level.clamp(0, MAX_LEVEL as i64) as u8,
        }
    }
}

/// `{ total: { "<year>": n }, contributions: [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionCalendar {
    pub total: BTreeMap<i32, u64>,
    pub contributions: Vec<ContributionDay>,
}

impl ContributionCalendar {
    pub fn new(year: i32, total: u64, contributions: Vec<ContributionDay>) -> Self {
        let mut totals = BTreeMap::new();
        totals.insert(year, total);
        Self {
            total: totals,
            contributions,
        }
    }

    /// Structurally valid all-zero payload for when every source failed.
    pub fn empty(year: i32) -> Self {
        Self::new(year, 0, Vec::new())
    }

    pub fn total_for(&self, year: i32) -> u64 {
        self.total.get(&year).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }
}
