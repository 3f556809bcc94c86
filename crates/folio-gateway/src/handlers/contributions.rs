//! `GET /api/github-contributions?year=YYYY`.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use super::record;
use crate::app_state::AppState;
use crate::providers::CalendarQuery;

pub const ROUTE: &str = "/api/github-contributions";

#[derive(Debug, Default, Deserialize)]
pub struct YearParams {
    #[serde(default)]
    pub year: Option<String>,
}

/// Requested year, or `current` when absent, non-numeric, or not positive.
pub fn resolve_year(raw: Option<&str>, current: i32) -> i32 {
    raw.and_then(|s| s.trim().parse::<i32>().ok())
        .filter(|y| *y > 0)
        .unwrap_or(current)
}

pub async fn github_contributions(
    State(app): State<AppState>,
    params: Option<Query<YearParams>>,
) -> Response {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let year = resolve_year(params.year.as_deref(), Utc::now().year());

    let resolved = app.contributions().resolve(&CalendarQuery { year }).await;
    tracing::debug!(year, source = resolved.source, days = resolved.value.contributions.len(), "contributions served");

    record(&app, ROUTE, Json(resolved.value).into_response())
}
