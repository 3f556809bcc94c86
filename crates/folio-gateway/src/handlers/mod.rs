//! HTTP handlers for the widget endpoints.
//!
//! Every handler answers in its declared shape; upstream and store failures
//! are absorbed here and never surface as error statuses.

pub mod coding;
pub mod contributions;
pub mod video;
pub mod visitor_count;

use axum::response::Response;

use crate::app_state::AppState;

pub use coding::wakatime;
pub use contributions::github_contributions;
pub use video::youtube;
pub use visitor_count::visitor_count;

/// Count the response by route and status, then hand it back.
fn record(app: &AppState, route: &'static str, resp: Response) -> Response {
    app.metrics()
        .http_requests
        .inc(&[("route", route), ("status", resp.status().as_str())]);
    resp
}
