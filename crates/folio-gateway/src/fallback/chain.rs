use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use folio_core::error::{ClientCode, Result};

use crate::obs::GatewayMetrics;

/// Source name reported when every source failed.
pub const DEFAULT_SOURCE: &str = "default";

/// One upstream provider able to answer `Q` with `T`.
#[async_trait]
pub trait Source<Q, T>: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(&self, query: &Q) -> Result<T>;
}

/// A value plus the name of the source that produced it.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub value: T,
    pub source: &'static str,
}

impl<T> Resolved<T> {
    pub fn is_default(&self) -> bool {
        self.source == DEFAULT_SOURCE
    }
}

/// Sources tried strictly in order, then a terminal default.
///
/// Each source gets exactly one attempt per `resolve`. Failures are logged and
/// counted, never returned: the caller always receives a `T`.
pub struct FallbackChain<Q, T> {
    endpoint: &'static str,
    sources: Vec<Arc<dyn Source<Q, T>>>,
    terminal: Box<dyn Fn(&Q) -> T + Send + Sync>,
    metrics: Arc<GatewayMetrics>,
}

impl<Q: Sync, T> FallbackChain<Q, T> {
    pub fn new<F>(endpoint: &'static str, metrics: Arc<GatewayMetrics>, terminal: F) -> Self
    where
        F: Fn(&Q) -> T + Send + Sync + 'static,
    {
        Self {
            endpoint,
            sources: Vec::new(),
            terminal: Box::new(terminal),
            metrics,
        }
    }

    pub fn with_source(mut self, source: Arc<dyn Source<Q, T>>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub async fn resolve(&self, query: &Q) -> Resolved<T> {
        for source in &self.sources {
            let name = source.name();
            let labels = [("endpoint", self.endpoint), ("source", name)];

            let started = Instant::now();
            let res = source.fetch(query).await;
            self.metrics
                .upstream_duration
                .observe(&labels, started.elapsed());

            match res {
                Ok(value) => {
                    self.metrics.upstream_attempts.inc(&[
                        ("endpoint", self.endpoint),
                        ("source", name),
                        ("outcome", "ok"),
                    ]);
                    self.metrics.served.inc(&labels);
                    tracing::debug!(endpoint = self.endpoint, source = name, "served from source");
                    return Resolved { value, source: name };
                }
                Err(e) => {
                    let code = e.client_code();
                    self.metrics.upstream_attempts.inc(&[
                        ("endpoint", self.endpoint),
                        ("source", name),
                        ("outcome", code.as_str()),
                    ]);
                    if code == ClientCode::NotConfigured {
                        tracing::debug!(endpoint = self.endpoint, source = name, error = %e, "source skipped");
                    } else {
                        tracing::warn!(endpoint = self.endpoint, source = name, error = %e, "source failed, trying next");
                    }
                }
            }
        }

        self.metrics
            .served
            .inc(&[("endpoint", self.endpoint), ("source", DEFAULT_SOURCE)]);
        tracing::warn!(endpoint = self.endpoint, "all sources failed, serving default");

        Resolved {
            value: (self.terminal)(query),
            source: DEFAULT_SOURCE,
        }
    }
}
