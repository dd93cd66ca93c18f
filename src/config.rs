//! Pipeline configuration: time budgets, retry policy, endpoints, caching.
//!
//! Defaults match production use. `ImportConfig::from_env` overlays the
//! `LEAGUE_IMPORT_*` environment variables on top of them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::core::cache::default_cache_dir;
use crate::core::retry::RetryPolicy;
use crate::error::{ImportError, Result};

pub const BUDGET_ENV_VAR: &str = "LEAGUE_IMPORT_BUDGET_SECS";
pub const NAV_TIMEOUT_ENV_VAR: &str = "LEAGUE_IMPORT_NAV_TIMEOUT_SECS";
pub const MAX_RETRIES_ENV_VAR: &str = "LEAGUE_IMPORT_MAX_RETRIES";
/// Directory for the Sleeper player catalog, or `off` to disable caching.
pub const CACHE_DIR_ENV_VAR: &str = "LEAGUE_IMPORT_CACHE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Wall-clock budget for one import, spanning every retry
    #[serde(with = "secs")]
    pub job_budget: Duration,
    /// Hard bound on a single page navigation
    #[serde(with = "secs")]
    pub navigation_timeout: Duration,
    /// Per-request timeout for API calls
    #[serde(with = "secs")]
    pub http_timeout: Duration,
    /// Time an aborted adapter gets to close its browser context
    #[serde(with = "secs")]
    pub cancel_grace: Duration,
    pub retry: RetryPolicy,
    pub user_agent: String,
    pub endpoints: Endpoints,
    pub catalog_cache: CatalogCacheConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            job_budget: Duration::from_secs(60),
            navigation_timeout: Duration::from_secs(30),
            http_timeout: Duration::from_secs(15),
            cancel_grace: Duration::from_secs(2),
            retry: RetryPolicy::default(),
            user_agent: concat!("league-import/", env!("CARGO_PKG_VERSION")).to_string(),
            endpoints: Endpoints::default(),
            catalog_cache: CatalogCacheConfig::default(),
        }
    }
}

/// Base URLs per platform. Overridden in tests and behind proxies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub espn: String,
    pub yahoo: String,
    pub sleeper_api: String,
    pub sleeper_web: String,
    /// CBS leagues live on their own subdomain; the league URL host must end
    /// with this suffix.
    pub cbs_host_suffix: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            espn: "https://fantasy.espn.com".to_string(),
            yahoo: "https://football.fantasysports.yahoo.com".to_string(),
            sleeper_api: "https://api.sleeper.app/v1".to_string(),
            sleeper_web: "https://sleeper.com".to_string(),
            cbs_host_suffix: "cbssports.com".to_string(),
        }
    }
}

/// On-disk cache for the Sleeper player catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogCacheConfig {
    /// `None` disables the cache
    pub dir: Option<PathBuf>,
    #[serde(with = "secs")]
    pub ttl: Duration,
}

impl Default for CatalogCacheConfig {
    fn default() -> Self {
        Self {
            dir: Some(default_cache_dir()),
            ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl ImportConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(secs) = env_u64(BUDGET_ENV_VAR)? {
            config.job_budget = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64(NAV_TIMEOUT_ENV_VAR)? {
            config.navigation_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = env_u64(MAX_RETRIES_ENV_VAR)? {
            config.retry.max_retries = u32::try_from(n)
                .map_err(|_| ImportError::config(format!("{MAX_RETRIES_ENV_VAR} is too large")))?;
        }
        if let Ok(dir) = std::env::var(CACHE_DIR_ENV_VAR) {
            config.catalog_cache.dir = match dir.trim() {
                "" | "off" | "none" => None,
                d => Some(PathBuf::from(d)),
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.job_budget.is_zero() {
            return Err(ImportError::config("job budget must be positive"));
        }
        if self.navigation_timeout.is_zero() || self.http_timeout.is_zero() {
            return Err(ImportError::config("request timeouts must be positive"));
        }
        self.retry.validate()
    }
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ImportError::config(format!("{name} must be a whole number, got {raw:?}"))),
        Err(_) => Ok(None),
    }
}

/// Durations as (fractional) seconds in config files.
pub(crate) mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
