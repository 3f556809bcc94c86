//! `GET /api/youtube`.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use super::record;
use crate::app_state::AppState;
use crate::providers::VideoQuery;

pub const ROUTE: &str = "/api/youtube";

/// Edge caching for live picks; the static fallback is not cached.
pub const LIVE_CACHE_CONTROL: &str = "public, s-maxage=60, stale-while-revalidate=300";

pub async fn youtube(State(app): State<AppState>) -> Response {
    let resolved = app.video().resolve(&VideoQuery { now: Utc::now() }).await;

    let resp = if resolved.is_default() {
        Json(resolved.value).into_response()
    } else {
        ([(header::CACHE_CONTROL, LIVE_CACHE_CONTROL)], Json(resolved.value)).into_response()
    };
    record(&app, ROUTE, resp)
}
