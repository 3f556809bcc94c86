//! Shared application state for the folio gateway.
//!
//! Built once at startup: config, one HTTP client, the counter store, and one
//! fallback chain per aggregator endpoint. Handlers only read from it.

use std::sync::Arc;
use std::time::Duration;

use folio_core::error::Result;
use folio_core::model::{CodingSummary, ContributionCalendar, VideoDescriptor};

use crate::config::{GatewayConfig, Secrets};
use crate::counter::{self, CounterStore, SessionDedup};
use crate::fallback::{FallbackChain, Source};
use crate::obs::GatewayMetrics;
use crate::providers::{
    self, CalendarQuery, ContributionsApiSource, GithubGraphQlSource, SummaryQuery, VideoQuery,
    WakatimeSource, YoutubeSource,
};

pub type ContributionSource = Arc<dyn Source<CalendarQuery, ContributionCalendar>>;
pub type CodingSource = Arc<dyn Source<SummaryQuery, CodingSummary>>;
pub type VideoSource = Arc<dyn Source<VideoQuery, VideoDescriptor>>;

/// Swappable collaborators; `AppState::new` builds the real ones.
pub struct Components {
    pub counter: Arc<dyn CounterStore>,
    /// Tried in order: primary first.
    pub contributions: Vec<ContributionSource>,
    pub coding: Vec<CodingSource>,
    pub video: Vec<VideoSource>,
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    metrics: Arc<GatewayMetrics>,
    counter: Arc<dyn CounterStore>,
    dedup: SessionDedup,
    contributions: FallbackChain<CalendarQuery, ContributionCalendar>,
    coding: FallbackChain<SummaryQuery, CodingSummary>,
    video: FallbackChain<VideoQuery, VideoDescriptor>,
}

impl AppState {
    /// Build application state from config and environment credentials.
    /// Returns Result so main can report startup errors instead of panicking.
    pub fn new(cfg: GatewayConfig, secrets: Secrets) -> Result<Self> {
        tracing::info!(?secrets, "credentials");

        let http = providers::build_http_client(&cfg.upstream)?;
        let counter = counter::build_store(&cfg.counter, &secrets, http.clone());

        let gh = &cfg.github;
        let components = Components {
            counter,
            contributions: vec![
                Arc::new(GithubGraphQlSource::new(
                    http.clone(),
                    gh.graphql_url.clone(),
                    gh.username.clone(),
                    secrets.github_token.clone(),
                )),
                Arc::new(ContributionsApiSource::new(
                    http.clone(),
                    gh.contributions_api_url.clone(),
                    gh.username.clone(),
                )),
            ],
            coding: vec![Arc::new(WakatimeSource::new(
                http.clone(),
                cfg.wakatime.api_url.clone(),
                cfg.wakatime.window_days,
                secrets.wakatime_api_key.clone(),
            ))],
            video: vec![Arc::new(YoutubeSource::new(
                http,
                &cfg.youtube,
                secrets.youtube_api_key.clone(),
                secrets.youtube_playlist_id.clone(),
            ))],
        };

        Ok(Self::assemble(cfg, components))
    }

    /// Wire chains and dedup around the given collaborators.
    pub fn assemble(cfg: GatewayConfig, components: Components) -> Self {
        let metrics = Arc::new(GatewayMetrics::default());

        let mut contributions =
            FallbackChain::new("github_contributions", metrics.clone(), |q: &CalendarQuery| {
                ContributionCalendar::empty(q.year)
            });
        for s in components.contributions {
            contributions = contributions.with_source(s);
        }

        let mut coding =
            FallbackChain::new("wakatime", metrics.clone(), |_: &SummaryQuery| CodingSummary::inactive());
        for s in components.coding {
            coding = coding.with_source(s);
        }

        let fallback_video = cfg.youtube.fallback.to_descriptor();
        let mut video = FallbackChain::new("youtube", metrics.clone(), move |_: &VideoQuery| {
            fallback_video.clone()
        });
        for s in components.video {
            video = video.with_source(s);
        }

        let dedup = SessionDedup::new(
            Duration::from_secs(cfg.counter.dedup_ttl_secs),
            cfg.counter.dedup_max_entries,
        );

        tracing::info!(
            counter = components.counter.backend(),
            contributions = ?contributions.source_names(),
            coding = ?coding.source_names(),
            video = ?video.source_names(),
            dedup = dedup.enabled(),
            "gateway state assembled"
        );

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics,
                counter: components.counter,
                dedup,
                contributions,
                coding,
                video,
            }),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    pub fn counter(&self) -> &dyn CounterStore {
        self.inner.counter.as_ref()
    }

    pub fn dedup(&self) -> &SessionDedup {
        &self.inner.dedup
    }

    pub fn contributions(&self) -> &FallbackChain<CalendarQuery, ContributionCalendar> {
        &self.inner.contributions
    }

    pub fn coding(&self) -> &FallbackChain<SummaryQuery, CodingSummary> {
        &self.inner.coding
    }

    pub fn video(&self) -> &FallbackChain<VideoQuery, VideoDescriptor> {
        &self.inner.video
    }
}
