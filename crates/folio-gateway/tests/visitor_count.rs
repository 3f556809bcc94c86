#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::Response,
};

use folio_core::error::{FolioError, Result};
use folio_gateway::app_state::{AppState, Components};
use folio_gateway::config::GatewayConfig;
use folio_gateway::counter::dedup::SESSION_HEADER;
use folio_gateway::counter::{CounterStore, DisabledCounterStore, MemoryCounterStore};
use folio_gateway::handlers::visitor_count;

fn state_with(counter: Arc<dyn CounterStore>) -> AppState {
    AppState::assemble(
        GatewayConfig::default(),
        Components {
            counter,
            contributions: Vec::new(),
            coding: Vec::new(),
            video: Vec::new(),
        },
    )
}

async fn call(app: &AppState, method: Method, headers: HeaderMap) -> Response {
    visitor_count(State(app.clone()), method, headers).await
}

async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn session(token: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(SESSION_HEADER, HeaderValue::from_str(token).unwrap());
    h
}

/// Fails every operation until `healthy` is flipped.
struct FlakyStore {
    healthy: AtomicBool,
    inner: MemoryCounterStore,
}

#[async_trait]
impl CounterStore for FlakyStore {
    fn backend(&self) -> &'static str {
        "flaky"
    }

    async fn read(&self) -> Result<u64> {
        if self.healthy.load(Ordering::SeqCst) {
            self.inner.read().await
        } else {
            Err(FolioError::Store("connection reset".into()))
        }
    }

    async fn increment(&self) -> Result<u64> {
        if self.healthy.load(Ordering::SeqCst) {
            self.inner.increment().await
        } else {
            Err(FolioError::Store("connection reset".into()))
        }
    }
}

#[tokio::test]
async fn unconfigured_store_answers_zero_with_200() {
    let app = state_with(Arc::new(DisabledCounterStore::new("UPSTASH_REDIS_REST_URL/TOKEN")));

    for method in [Method::GET, Method::POST] {
        let resp = call(&app, method, HeaderMap::new()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!({ "count": 0 }));
    }
}

#[tokio::test]
async fn get_reads_without_incrementing() {
    let app = state_with(Arc::new(MemoryCounterStore::starting_at(41)));

    for _ in 0..3 {
        let resp = call(&app, Method::GET, HeaderMap::new()).await;
        assert_eq!(body_json(resp).await["count"], 41);
    }
}

#[tokio::test]
async fn posts_increment_strictly() {
    let app = state_with(Arc::new(MemoryCounterStore::starting_at(41)));

    let first = body_json(call(&app, Method::POST, HeaderMap::new()).await).await;
    let second = body_json(call(&app, Method::POST, HeaderMap::new()).await).await;
    assert_eq!(first["count"], 42);
    assert_eq!(second["count"], 43);

    let read = body_json(call(&app, Method::GET, HeaderMap::new()).await).await;
    assert_eq!(read["count"], 43);
}

#[tokio::test]
async fn other_verbs_get_405_with_allow() {
    let app = state_with(Arc::new(MemoryCounterStore::new()));

    for method in [Method::DELETE, Method::PUT, Method::PATCH] {
        let resp = call(&app, method.clone(), HeaderMap::new()).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers().get(header::ALLOW).unwrap(), "GET, POST");

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes, format!("Method {method} Not Allowed").as_bytes());
    }

    let read = body_json(call(&app, Method::GET, HeaderMap::new()).await).await;
    assert_eq!(read["count"], 0);
}

#[tokio::test]
async fn same_session_counts_once() {
    let app = state_with(Arc::new(MemoryCounterStore::new()));

    let a = body_json(call(&app, Method::POST, session("tab-a")).await).await;
    let again = body_json(call(&app, Method::POST, session("tab-a")).await).await;
    let b = body_json(call(&app, Method::POST, session("tab-b")).await).await;

    assert_eq!(a["count"], 1);
    assert_eq!(again["count"], 1);
    assert_eq!(b["count"], 2);
    assert_eq!(app.metrics().dedup_hits.get(&[]), 1);
}

#[tokio::test]
async fn failed_increment_releases_the_session() {
    let store = Arc::new(FlakyStore {
        healthy: AtomicBool::new(false),
        inner: MemoryCounterStore::starting_at(7),
    });
    let app = state_with(store.clone());

    let failed = call(&app, Method::POST, session("tab-a")).await;
    assert_eq!(failed.status(), StatusCode::OK);
    assert_eq!(body_json(failed).await["count"], 0);

    store.healthy.store(true, Ordering::SeqCst);
    let retried = body_json(call(&app, Method::POST, session("tab-a")).await).await;
    assert_eq!(retried["count"], 8);
    assert_eq!(
        app.metrics()
            .counter_ops
            .get(&[("op", "increment"), ("outcome", "STORE")]),
        1
    );
}

#[tokio::test]
async fn failing_store_reads_as_zero() {
    let store = Arc::new(FlakyStore {
        healthy: AtomicBool::new(false),
        inner: MemoryCounterStore::starting_at(7),
    });
    let app = state_with(store);

    let resp = call(&app, Method::GET, HeaderMap::new()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!({ "count": 0 }));
    assert_eq!(
        app.metrics().counter_ops.get(&[("op", "read"), ("outcome", "STORE")]),
        1
    );
}
