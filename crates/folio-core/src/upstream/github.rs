//! GitHub GraphQL contribution calendar.

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::model::{ContributionCalendar, ContributionDay};

pub const SOURCE: &str = "github_graphql";

pub const CALENDAR_QUERY: &str = r#"
query($username: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $username) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            date
            contributionCount
            contributionLevel
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'static str,
    pub variables: CalendarVariables<'a>,
}

#[derive(Debug, Serialize)]
pub struct CalendarVariables<'a> {
    pub username: &'a str,
    pub from: String,
    pub to: String,
}

/// Request body covering the whole calendar year (UTC).
pub fn calendar_request(username: &str, year: i32) -> GraphQlRequest<'_> {
    GraphQlRequest {
        query: CALENDAR_QUERY,
        variables: CalendarVariables {
            username,
            from: format!("{year}-01-01T00:00:00Z"),
            to: format!("{year}-12-31T23:59:59Z"),
        },
    }
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<ResponseData>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ResponseData {
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub contributions_collection: Option<ContributionsCollection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    pub contribution_calendar: Option<Calendar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub total_contributions: u64,
    #[serde(default)]
    pub weeks: Vec<Week>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    #[serde(default)]
    pub contribution_days: Vec<Day>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub date: chrono::NaiveDate,
    pub contribution_count: i64,
    #[serde(default)]
    pub contribution_level: String,
}

/// GitHub quartile names onto the 0..=4 scale. Unknown names are 0.
pub fn level_from_quartile(level: &str) -> u8 {
    match level {
        "FIRST_QUARTILE" => 1,
        "SECOND_QUARTILE" => 2,
        "THIRD_QUARTILE" => 3,
        "FOURTH_QUARTILE" => 4,
        _ => 0,
    }
}

impl GraphQlResponse {
    /// Normalize into the served calendar shape.
    ///
    /// A GraphQL `errors` array, a missing calendar, or a calendar with no days
    /// are all failures so the caller moves on to the next source.
    pub fn into_calendar(self, year: i32) -> Result<ContributionCalendar> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            let joined = errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(FolioError::upstream(SOURCE, format!("graphql errors: {joined}")));
        }

        let calendar = self
            .data
            .and_then(|d| d.user)
            .and_then(|u| u.contributions_collection)
            .and_then(|c| c.contribution_calendar)
            .ok_or(FolioError::EmptyResult(SOURCE))?;

        let contributions: Vec<ContributionDay> = calendar
            .weeks
            .into_iter()
            .flat_map(|w| w.contribution_days)
            .map(|d| {
                ContributionDay::clamped(
                    d.date,
                    d.contribution_count,
                    level_from_quartile(&d.contribution_level) as i64,
                )
            })
            .collect();

        if contributions.is_empty() {
            return Err(FolioError::EmptyResult(SOURCE));
        }

        Ok(ContributionCalendar::new(
            year,
            calendar.total_contributions,
            contributions,
        ))
    }
}
