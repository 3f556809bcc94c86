//! Axum router wiring.
//!
//! Widget endpoints live under `/api`, operational ones at the root.

use axum::{
    routing::{any, get},
    Router,
};

use crate::{app_state::AppState, handlers, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // verb dispatch (and the 405) is done by the handler itself
        .route(handlers::visitor_count::ROUTE, any(handlers::visitor_count))
        .route(handlers::contributions::ROUTE, get(handlers::github_contributions))
        .route(handlers::coding::ROUTE, get(handlers::wakatime))
        .route(handlers::video::ROUTE, get(handlers::youtube))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
