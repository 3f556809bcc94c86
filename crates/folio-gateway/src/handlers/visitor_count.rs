//! `GET/POST /api/visitor-count`.
//!
//! Both verbs answer 200 `{count}`. Store failures and missing credentials
//! yield the sentinel `{count: 0}`; anything else is 405.

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use folio_core::error::ClientCode;
use folio_core::model::CountReply;

use super::record;
use crate::app_state::AppState;
use crate::counter::dedup::session_token;

pub const ROUTE: &str = "/api/visitor-count";
pub const ALLOWED: &str = "GET, POST";

pub async fn visitor_count(State(app): State<AppState>, method: Method, headers: HeaderMap) -> Response {
    let resp = match method {
        Method::GET => Json(read_count(&app).await).into_response(),
        Method::POST => Json(increment_count(&app, session_token(&headers)).await).into_response(),
        other => method_not_allowed(&other),
    };
    record(&app, ROUTE, resp)
}

fn method_not_allowed(method: &Method) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, ALLOWED)],
        format!("Method {method} Not Allowed"),
    )
        .into_response()
}

async fn read_count(app: &AppState) -> CountReply {
    let store = app.counter();
    match store.read().await {
        Ok(count) => {
            app.metrics().counter_ops.inc(&[("op", "read"), ("outcome", "ok")]);
            CountReply::new(count)
        }
        Err(e) => {
            let code = e.client_code();
            app.metrics().counter_ops.inc(&[("op", "read"), ("outcome", code.as_str())]);
            log_store_failure(store.backend(), "read", code, &e);
            CountReply::sentinel()
        }
    }
}

async fn increment_count(app: &AppState, session: Option<&str>) -> CountReply {
    if let Some(token) = session {
        if !app.dedup().claim(token) {
            app.metrics().dedup_hits.inc(&[]);
            tracing::debug!("session already counted, reading instead");
            return read_count(app).await;
        }
    }

    let store = app.counter();
    match store.increment().await {
        Ok(count) => {
            app.metrics().counter_ops.inc(&[("op", "increment"), ("outcome", "ok")]);
            CountReply::new(count)
        }
        Err(e) => {
            if let Some(token) = session {
                app.dedup().release(token);
            }
            let code = e.client_code();
            app.metrics()
                .counter_ops
                .inc(&[("op", "increment"), ("outcome", code.as_str())]);
            log_store_failure(store.backend(), "increment", code, &e);
            CountReply::sentinel()
        }
    }
}

fn log_store_failure(backend: &str, op: &str, code: ClientCode, e: &folio_core::FolioError) {
    if code == ClientCode::NotConfigured {
        tracing::debug!(backend, op, error = %e, "visitor counter not configured");
    } else {
        tracing::warn!(backend, op, error = %e, "visitor counter store failed");
    }
}
