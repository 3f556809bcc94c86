use std::net::SocketAddr;

use serde::Deserialize;
use folio_core::error::{FolioError, Result};
use folio_core::model::VideoDescriptor;
use folio_core::upstream::youtube::DEFAULT_KEYWORDS;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub counter: CounterSection,

    #[serde(default)]
    pub upstream: UpstreamSection,

    #[serde(default)]
    pub github: GithubSection,

    #[serde(default)]
    pub wakatime: WakatimeSection,

    #[serde(default)]
    pub youtube: YoutubeSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(FolioError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.counter.validate()?;
        self.upstream.validate()?;
        self.github.validate()?;
        self.wakatime.validate()?;
        self.youtube.validate()?;

        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            counter: CounterSection::default(),
            upstream: UpstreamSection::default(),
            github: GithubSection::default(),
            wakatime: WakatimeSection::default(),
            youtube: YoutubeSection::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| FolioError::Config(format!("server.listen must be a socket address: {e}")))
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}

/// Which counter store backs `/api/visitor-count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CounterBackend {
    /// Redis REST API (URL + token from the environment).
    #[default]
    Upstash,
    /// Native Redis protocol (`REDIS_URL`).
    Redis,
    /// In-process counter; resets on restart.
    Memory,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterSection {
    #[serde(default)]
    pub backend: CounterBackend,

    #[serde(default = "default_counter_key")]
    pub key: String,

    /// 0 disables server-side session dedup.
    #[serde(default = "default_dedup_ttl_secs")]
    pub dedup_ttl_secs: u64,

    #[serde(default = "default_dedup_max_entries")]
    pub dedup_max_entries: usize,
}

impl Default for CounterSection {
    fn default() -> Self {
        Self {
            backend: CounterBackend::default(),
            key: default_counter_key(),
            dedup_ttl_secs: default_dedup_ttl_secs(),
            dedup_max_entries: default_dedup_max_entries(),
        }
    }
}

impl CounterSection {
    pub fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(FolioError::Config("counter.key must not be empty".into()));
        }
        if self.dedup_ttl_secs > 7 * 24 * 3600 {
            return Err(FolioError::Config(
                "counter.dedup_ttl_secs must be at most one week".into(),
            ));
        }
        if !(16..=1_000_000).contains(&self.dedup_max_entries) {
            return Err(FolioError::Config(
                "counter.dedup_max_entries must be between 16 and 1000000".into(),
            ));
        }
        Ok(())
    }
}

fn default_counter_key() -> String {
    "portfolio:visitor_count".into()
}
fn default_dedup_ttl_secs() -> u64 {
    1800
}
fn default_dedup_max_entries() -> usize {
    50_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamSection {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl UpstreamSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=60_000).contains(&self.timeout_ms) {
            return Err(FolioError::Config(
                "upstream.timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(FolioError::Config("upstream.user_agent must not be empty".into()));
        }
        Ok(())
    }
}

fn default_timeout_ms() -> u64 {
    5000
}
fn default_user_agent() -> String {
    concat!("folio-gateway/", env!("CARGO_PKG_VERSION")).into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GithubSection {
    #[serde(default = "default_github_username")]
    pub username: String,

    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,

    #[serde(default = "default_contributions_api_url")]
    pub contributions_api_url: String,
}

impl Default for GithubSection {
    fn default() -> Self {
        Self {
            username: default_github_username(),
            graphql_url: default_graphql_url(),
            contributions_api_url: default_contributions_api_url(),
        }
    }
}

impl GithubSection {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(FolioError::Config("github.username must not be empty".into()));
        }
        Ok(())
    }
}

fn default_github_username() -> String {
    "octocat".into()
}
fn default_graphql_url() -> String {
    "https://api.github.com/graphql".into()
}
fn default_contributions_api_url() -> String {
    "https://github-contributions-api.jogruber.de/v4".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WakatimeSection {
    #[serde(default = "default_wakatime_url")]
    pub api_url: String,

    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for WakatimeSection {
    fn default() -> Self {
        Self {
            api_url: default_wakatime_url(),
            window_days: default_window_days(),
        }
    }
}

impl WakatimeSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=14).contains(&self.window_days) {
            return Err(FolioError::Config(
                "wakatime.window_days must be between 1 and 14".into(),
            ));
        }
        Ok(())
    }
}

fn default_wakatime_url() -> String {
    "https://wakatime.com/api/v1".into()
}
fn default_window_days() -> u32 {
    7
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YoutubeSection {
    #[serde(default = "default_youtube_url")]
    pub api_url: String,

    #[serde(default = "default_max_results")]
    pub max_results: u32,

    #[serde(default = "default_recency_override_hours")]
    pub recency_override_hours: u32,

    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub fallback: FallbackVideo,
}

impl Default for YoutubeSection {
    fn default() -> Self {
        Self {
            api_url: default_youtube_url(),
            max_results: default_max_results(),
            recency_override_hours: default_recency_override_hours(),
            keywords: default_keywords(),
            fallback: FallbackVideo::default(),
        }
    }
}

impl YoutubeSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=50).contains(&self.max_results) {
            return Err(FolioError::Config(
                "youtube.max_results must be between 1 and 50".into(),
            ));
        }
        if self.recency_override_hours > 24 * 30 {
            return Err(FolioError::Config(
                "youtube.recency_override_hours must be at most 720".into(),
            ));
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(FolioError::Config("youtube.keywords must not contain blanks".into()));
        }
        Ok(())
    }

    pub fn recency(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.recency_override_hours))
    }
}

fn default_youtube_url() -> String {
    "https://www.googleapis.com/youtube/v3".into()
}
fn default_max_results() -> u32 {
    50
}
fn default_recency_override_hours() -> u32 {
    48
}
fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

/// Static "currently learning" record served when no live pick is available.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FallbackVideo {
    pub title: String,
    pub channel: String,
    pub thumbnail: String,
    pub link: String,
    pub published_at: String,
    pub progress: u8,
    pub watching: bool,
}

impl Default for FallbackVideo {
    fn default() -> Self {
        Self {
            title: "The Rust Programming Language".into(),
            channel: "Rust".into(),
            thumbnail: "/images/currently-learning.jpg".into(),
            link: "https://www.youtube.com/".into(),
            published_at: "2024-01-01T00:00:00Z".into(),
            progress: 60,
            watching: true,
        }
    }
}

impl FallbackVideo {
    pub fn to_descriptor(&self) -> VideoDescriptor {
        VideoDescriptor {
            title: self.title.clone(),
            channel: self.channel.clone(),
            thumbnail: self.thumbnail.clone(),
            link: self.link.clone(),
            published_at: self.published_at.clone(),
            progress: self.progress.min(100),
            watching: self.watching,
        }
    }
}
