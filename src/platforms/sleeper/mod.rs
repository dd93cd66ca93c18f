//! Sleeper adapter (hybrid API).
//!
//! Sleeper exposes a public read API, so league, rosters, users and the
//! player catalog are fetched directly and in parallel. The only field the
//! API sometimes leaves out is an owner's display name; when that happens the
//! public league page is fetched once and owner names are read from it.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use url::Url;

use super::{base_url, join, AdapterContext, PlatformAdapter};
use crate::acquire::api::HybridApi;
use crate::acquire::dom;
use crate::config::{CatalogCacheConfig, ImportConfig};
use crate::core::cache::{player_catalog_path, try_read_fresh, write_string};
use crate::credentials::Credentials;
use crate::error::{ErrorKind, ImportError, Result};
use crate::normalize::RawPayload;
use crate::types::Platform;

mod types;


pub use types::{
    PlayerCatalog, SleeperLeague, SleeperPayload, SleeperPlayer, SleeperRoster, SleeperUser,
    SleeperUserMetadata,
};

pub const SPORT: &str = "nfl";

/// Longest league id Sleeper has been seen to issue, with headroom.
pub const MAX_LEAGUE_ID_LEN: usize = 32;

/// Owner name elements on the public league page.
pub const OWNER_NAME: &str = "[data-owner-id]";
pub const OWNER_ID_ATTR: &str = "data-owner-id";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SleeperOptions {
    pub league_id: String,
}

pub struct SleeperAdapter {
    api: Url,
    web: Url,
    cache: CatalogCacheConfig,
}

impl SleeperAdapter {
    pub fn new(config: &ImportConfig) -> Result<Self> {
        Ok(Self {
            api: base_url(&config.endpoints.sleeper_api)?,
            web: base_url(&config.endpoints.sleeper_web)?,
            cache: config.catalog_cache.clone(),
        })
    }

    /// The NFL player catalog, from the disk cache when fresh.
    ///
    /// Sleeper asks clients to pull the catalog at most once a day. Cache
    /// problems only cost a refetch.
    async fn player_catalog(&self, api: &HybridApi<'_>) -> Result<PlayerCatalog> {
        let path = self.cache.dir.as_deref().map(|dir| player_catalog_path(dir, SPORT));

        if let Some(p) = &path {
            if let Some(cached) = try_read_fresh(p, self.cache.ttl) {
                match serde_json::from_str::<PlayerCatalog>(&cached) {
                    Ok(catalog) => {
                        debug!(players = catalog.len(), "player catalog cache hit");
                        return Ok(catalog);
                    }
                    Err(e) => debug!("ignoring unreadable player catalog cache: {e}"),
                }
            }
        }

        let url = join(&self.api, &format!("players/{SPORT}"))?;
        let catalog: PlayerCatalog = api.get_json(url, "player catalog").await?;

        if let Some(p) = &path {
            match serde_json::to_string(&catalog) {
                Ok(json) => {
                    if let Err(e) = write_string(p, &json) {
                        warn!("failed to cache player catalog: {e}");
                    }
                }
                Err(e) => warn!("failed to serialize player catalog: {e}"),
            }
        }
        Ok(catalog)
    }

    /// Owner names from the public league page, for `owner_ids` only.
    async fn scrape_owner_names(
        &self,
        api: &HybridApi<'_>,
        league_id: &str,
        owner_ids: &[String],
    ) -> Result<HashMap<String, String>> {
        let url = join(&self.web, &format!("leagues/{league_id}"))?;
        let page = api.fetch_page(url, "league page").await?;
        let names = dom::extract_attr_text_pairs(&page, OWNER_NAME, OWNER_ID_ATTR)?
            .into_iter()
            .filter(|(id, _)| owner_ids.contains(id))
            .collect();
        Ok(names)
    }
}

#[async_trait]
impl PlatformAdapter for SleeperAdapter {
    const PLATFORM: Platform = Platform::Sleeper;

    type Options = SleeperOptions;

    fn validate(&self, options: &SleeperOptions, _credentials: &Credentials) -> Result<()> {
        let id = options.league_id.as_str();
        if id.is_empty() || id.len() > MAX_LEAGUE_ID_LEN || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ImportError::config(format!(
                "Sleeper league id {id:?} must be 1-{MAX_LEAGUE_ID_LEN} digits"
            )));
        }
        Ok(())
    }

    async fn acquire(
        &self,
        ctx: &AdapterContext<'_>,
        options: &SleeperOptions,
        credentials: &Credentials,
    ) -> Result<RawPayload> {
        let id = options.league_id.as_str();
        let api = HybridApi::new(ctx, Self::PLATFORM, credentials)?;

        let league_url = join(&self.api, &format!("league/{id}"))?;
        let rosters_url = join(&self.api, &format!("league/{id}/rosters"))?;
        let users_url = join(&self.api, &format!("league/{id}/users"))?;

        let (league, rosters, users, players) = tokio::try_join!(
            api.get_json::<Option<SleeperLeague>>(league_url, "league"),
            api.get_json::<Option<Vec<SleeperRoster>>>(rosters_url, "rosters"),
            api.get_json::<Option<Vec<SleeperUser>>>(users_url, "users"),
            self.player_catalog(&api),
        )?;

        let league = league.ok_or_else(|| {
            ImportError::not_found(Self::PLATFORM, format!("league {id} does not exist"))
        })?;

        let mut payload = SleeperPayload {
            league,
            rosters: rosters.unwrap_or_default(),
            users: users.unwrap_or_default(),
            players,
            scraped_owner_names: HashMap::new(),
        };

        let unnamed = payload.unnamed_owner_ids();
        if !unnamed.is_empty() {
            info!(owners = unnamed.len(), "owner names missing from API, reading league page");
            match self.scrape_owner_names(&api, id, &unnamed).await {
                Ok(names) => payload.scraped_owner_names = names,
                Err(e) if e.kind() == ErrorKind::Timeout => return Err(e),
                Err(e) => warn!("league page supplement failed, keeping defaults: {e}"),
            }
        }

        Ok(RawPayload::Sleeper(payload))
    }
}
