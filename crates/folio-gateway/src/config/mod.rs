//! Gateway config loader (strict parsing) and environment credentials.

pub mod schema;
pub mod secrets;

use std::{env, fs, path::Path};

use folio_core::error::{FolioError, Result};

pub use schema::{
    CounterBackend, CounterSection, FallbackVideo, GatewayConfig, GithubSection, UpstreamSection,
    WakatimeSection, YoutubeSection,
};
pub use secrets::Secrets;

/// Environment variable naming the YAML config path.
pub const CONFIG_PATH_ENV: &str = "FOLIO_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "folio.yaml";

/// Load from `$FOLIO_CONFIG` (default `folio.yaml`).
///
/// A missing file means built-in defaults; an unreadable or invalid one is an error.
pub fn load() -> Result<GatewayConfig> {
    let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        tracing::info!(%path, "config file not found, using defaults");
        let cfg = GatewayConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    load_from_file(&path)
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<GatewayConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| FolioError::Config(format!("read {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| FolioError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
