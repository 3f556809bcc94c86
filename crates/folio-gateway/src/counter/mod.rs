//! Visitor counter: store backends and server-side session dedup.

pub mod dedup;
pub mod redis_store;
pub mod store;
pub mod upstash;

use std::sync::Arc;

pub use dedup::SessionDedup;
pub use redis_store::RedisCounterStore;
pub use store::{CounterStore, DisabledCounterStore, MemoryCounterStore};
pub use upstash::UpstashCounterStore;

use crate::config::{CounterBackend, CounterSection, Secrets};

/// Pick the configured backend, or a disabled store when its credentials are missing.
pub fn build_store(
    cfg: &CounterSection,
    secrets: &Secrets,
    http: reqwest::Client,
) -> Arc<dyn CounterStore> {
    match cfg.backend {
        CounterBackend::Upstash => match (&secrets.upstash_url, &secrets.upstash_token) {
            (Some(url), Some(token)) => Arc::new(UpstashCounterStore::new(
                http,
                url.clone(),
                token.clone(),
                cfg.key.clone(),
            )),
            _ => {
                tracing::warn!("UPSTASH_REDIS_REST_URL/TOKEN missing, visitor counter disabled");
                Arc::new(DisabledCounterStore::new("UPSTASH_REDIS_REST_URL/TOKEN"))
            }
        },
        CounterBackend::Redis => match &secrets.redis_url {
            Some(url) => match RedisCounterStore::new(url, cfg.key.clone()) {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    tracing::warn!(error = %e, "invalid REDIS_URL, visitor counter disabled");
                    Arc::new(DisabledCounterStore::new("REDIS_URL"))
                }
            },
            None => {
                tracing::warn!("REDIS_URL missing, visitor counter disabled");
                Arc::new(DisabledCounterStore::new("REDIS_URL"))
            }
        },
        CounterBackend::Memory => Arc::new(MemoryCounterStore::new()),
    }
}
