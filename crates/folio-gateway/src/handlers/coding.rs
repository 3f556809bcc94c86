//! `GET /api/wakatime`.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use super::record;
use crate::app_state::AppState;
use crate::providers::SummaryQuery;

pub const ROUTE: &str = "/api/wakatime";

pub async fn wakatime(State(app): State<AppState>) -> Response {
    let query = SummaryQuery {
        today: Utc::now().date_naive(),
    };
    let resolved = app.coding().resolve(&query).await;
    record(&app, ROUTE, Json(resolved.value).into_response())
}
