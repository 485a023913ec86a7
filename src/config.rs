use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{cache, intervals, limits, platform};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub platform: PlatformConfig,

    pub http: HttpConfig,

    pub cache: CacheConfig,

    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Tracing filter directive, e.g. "info" or "otlas_scout=debug".
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub base_url: String,

    pub user_agent: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: platform::DEFAULT_BASE_URL.to_string(),
            user_agent: platform::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Mandatory pause before every outbound request.
    pub request_delay_ms: u64,

    pub timeout_seconds: u64,

    /// Permits in the session's outbound-request limiter.
    pub concurrent_requests: usize,
}

impl Default for HttpConfig {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        Self {
            request_delay_ms: intervals::DEFAULT_REQUEST_DELAY.as_millis() as u64,
            timeout_seconds: intervals::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            concurrent_requests: limits::DEFAULT_CONCURRENT_REQUESTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,

    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: cache::DEFAULT_TTL_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default result cap when the caller does not pass one.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: limits::DEFAULT_MAX_RESULTS,
        }
    }
}

impl Config {
    /// Loads the first config file found on the probe path, falling back
    /// to defaults, then applies `.env` / environment overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_from_disk()?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_from_disk() -> Result<Self> {
        for path in Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(&path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("otlas-scout").join("config.toml"));
        }

        paths
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("OTLAS_BASE_URL") {
            self.platform.base_url = base_url;
        }
        if let Ok(user_agent) = std::env::var("OTLAS_USER_AGENT") {
            self.platform.user_agent = user_agent;
        }
        if let Ok(level) = std::env::var("OTLAS_LOG_LEVEL") {
            self.general.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.platform.base_url.is_empty() {
            anyhow::bail!("Platform base URL cannot be empty");
        }

        if self.http.timeout_seconds == 0 {
            anyhow::bail!("HTTP timeout must be > 0");
        }

        if self.http.concurrent_requests == 0 {
            anyhow::bail!("Concurrent request limit must be > 0");
        }

        if self.search.max_results == 0 || self.search.max_results > limits::MAX_RESULTS {
            anyhow::bail!(
                "Default max results must be between 1 and {}",
                limits::MAX_RESULTS
            );
        }

        Ok(())
    }

    #[must_use]
    pub const fn request_delay(&self) -> Duration {
        Duration::from_millis(self.http.request_delay_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_seconds)
    }
}
