//! Platform adapters.
//!
//! One adapter per supported platform, each pairing an acquisition strategy
//! with its normalizer. Adapters classify every failure into an
//! [`ImportError`] before it leaves them.

use async_trait::async_trait;
use std::sync::atomic::AtomicU32;
use tracing::debug;
use url::Url;

use crate::acquire::BrowserPool;
use crate::config::ImportConfig;
use crate::core::Cancellation;
use crate::credentials::Credentials;
use crate::error::{ImportError, Result};
use crate::model::LeagueImportResult;
use crate::normalize::{normalize, RawPayload};
use crate::types::Platform;

pub mod cbs;
pub mod espn;
pub mod sleeper;
pub mod yahoo;

pub use cbs::{CbsAdapter, CbsOptions};
pub use espn::{EspnAdapter, EspnOptions};
pub use sleeper::{SleeperAdapter, SleeperOptions};
pub use yahoo::{YahooAdapter, YahooOptions};

/// Shared resources handed to an adapter for one import.
pub struct AdapterContext<'a> {
    pub config: &'a ImportConfig,
    pub pool: &'a BrowserPool,
    pub cancel: &'a Cancellation,
    /// Incremented once per acquisition attempt, for the job's final log line
    pub attempts: &'a AtomicU32,
}

/// Platform-specific options for one import.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportOptions {
    Espn(EspnOptions),
    Yahoo(YahooOptions),
    Sleeper(SleeperOptions),
    Cbs(CbsOptions),
}

impl ImportOptions {
    pub fn platform(&self) -> Platform {
        match self {
            ImportOptions::Espn(_) => Platform::Espn,
            ImportOptions::Yahoo(_) => Platform::Yahoo,
            ImportOptions::Sleeper(_) => Platform::Sleeper,
            ImportOptions::Cbs(_) => Platform::Cbs,
        }
    }

    /// Identifies the target league within its platform.
    pub fn target_key(&self) -> String {
        match self {
            ImportOptions::Espn(o) => format!("{}:{}", o.league_id, o.season),
            ImportOptions::Yahoo(o) => o.league_key.clone(),
            ImportOptions::Sleeper(o) => o.league_id.clone(),
            ImportOptions::Cbs(o) => o.league_url.trim_end_matches('/').to_ascii_lowercase(),
        }
    }
}

#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    const PLATFORM: Platform;

    type Options: Send + Sync;

    /// Check options and credentials. Performs no I/O.
    fn validate(&self, options: &Self::Options, credentials: &Credentials) -> Result<()>;

    /// Fetch the raw league.
    async fn acquire(
        &self,
        ctx: &AdapterContext<'_>,
        options: &Self::Options,
        credentials: &Credentials,
    ) -> Result<RawPayload>;

    /// Validate, acquire and normalize.
    async fn import(
        &self,
        ctx: &AdapterContext<'_>,
        options: &Self::Options,
        credentials: &Credentials,
    ) -> Result<LeagueImportResult> {
        self.validate(options, credentials)?;
        let raw = self.acquire(ctx, options, credentials).await?;
        let result = normalize(raw);
        if result.teams.is_empty() {
            return Err(ImportError::not_found(
                Self::PLATFORM,
                format!("league {} has no teams", result.league_id),
            ));
        }
        debug!(
            platform = %Self::PLATFORM,
            teams = result.teams.len(),
            players = result.player_count(),
            warnings = result.warnings.len(),
            "league normalized"
        );
        Ok(result)
    }
}

/// Parse a configured base URL.
pub(crate) fn base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|e| ImportError::config(format!("invalid base URL {raw:?}: {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Join `path` onto `base`, keeping any path prefix `base` carries.
pub(crate) fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| ImportError::config(format!("invalid URL path {path:?}: {e}")))
}
