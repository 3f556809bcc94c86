//! Credentials read from the environment.
//!
//! Nothing here is ever read from the YAML file. Empty values count as unset,
//! and `Debug` only reveals which credentials are present.

use std::{env, fmt};

#[derive(Clone, Default)]
pub struct Secrets {
    pub github_token: Option<String>,
    pub wakatime_api_key: Option<String>,
    pub youtube_api_key: Option<String>,
    pub youtube_playlist_id: Option<String>,
    pub upstash_url: Option<String>,
    pub upstash_token: Option<String>,
    pub redis_url: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            github_token: get("GITHUB_TOKEN"),
            wakatime_api_key: get("WAKATIME_API_KEY"),
            youtube_api_key: get("YOUTUBE_API_KEY"),
            youtube_playlist_id: get("YOUTUBE_PLAYLIST_ID"),
            upstash_url: get("UPSTASH_REDIS_REST_URL"),
            upstash_token: get("UPSTASH_REDIS_REST_TOKEN"),
            redis_url: get("REDIS_URL"),
        }
    }
}

fn mark(v: &Option<String>) -> &'static str {
    if v.is_some() {
        "<set>"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("github_token", &mark(&self.github_token))
            .field("wakatime_api_key", &mark(&self.wakatime_api_key))
            .field("youtube_api_key", &mark(&self.youtube_api_key))
            .field("youtube_playlist_id", &mark(&self.youtube_playlist_id))
            .field("upstash_url", &mark(&self.upstash_url))
            .field("upstash_token", &mark(&self.upstash_token))
            .field("redis_url", &mark(&self.redis_url))
            .finish()
    }
}
