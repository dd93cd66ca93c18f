//! CBS Sports fantasy adapter (automated session).
//!
//! Every CBS league lives on its own subdomain
//! (`https://<league>.football.cbssports.com`); the first host label is the
//! league id. One session loads the all-teams rosters page and the scoring
//! rules page, both relative to the league URL.

use async_trait::async_trait;
use url::Url;

use super::{base_url, join, AdapterContext, PlatformAdapter};
use crate::acquire::dom::{self, RosterSelectors, ScoringSelectors, ScrapedLeague};
use crate::acquire::session::{AutomatedSession, LoginMarkers, Navigator, SessionScript};
use crate::config::ImportConfig;
use crate::credentials::Credentials;
use crate::error::{ImportError, Result};
use crate::normalize::RawPayload;
use crate::types::Platform;

pub const LOGIN_MARKERS: LoginMarkers = LoginMarkers {
    hosts: &[],
    path_fragments: &["/login", "/user/login"],
    form: Some("form#login_form"),
};

pub const ROSTERS_PATH: &str = "teams/all";
pub const SCORING_PATH: &str = "league/rules/scoring";

pub const LEAGUE_NAME: &str = "#leagueName";

pub const ROSTERS: RosterSelectors = RosterSelectors {
    team: "div.teamRoster",
    team_id_attr: "data-team-id",
    team_name: ".teamName",
    team_owner: ".teamOwner",
    player_row: "tr.playerRow",
    player_id_attr: "data-player-id",
    player_name: "a.playerLink",
    player_position: ".playerPosition",
    player_pro_team: ".playerTeam",
    player_slot: ".playerStatusSlot",
    player_status: ".playerInjury",
};

pub const SCORING: ScoringSelectors = ScoringSelectors {
    row: "table.scoringRules tr.rule",
    stat: ".ruleName",
    points: ".rulePoints",
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CbsOptions {
    pub league_url: String,
}

pub struct CbsAdapter {
    host_suffix: String,
}

impl CbsAdapter {
    pub fn new(config: &ImportConfig) -> Result<Self> {
        let host_suffix = config.endpoints.cbs_host_suffix.trim().to_ascii_lowercase();
        if host_suffix.is_empty() {
            return Err(ImportError::config("CBS host suffix must not be empty"));
        }
        Ok(Self { host_suffix })
    }

    /// Parse and check the league URL; returns it with the league id.
    fn league(&self, options: &CbsOptions) -> Result<(Url, String)> {
        let url = base_url(options.league_url.trim())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ImportError::config("CBS league URL must be http(s)"));
        }
        let host = url
            .host_str()
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| ImportError::config("CBS league URL has no host"))?;
        // the league is the subdomain, so the bare suffix names no league
        let league_host = host
            .strip_suffix(&self.host_suffix)
            .and_then(|prefix| prefix.strip_suffix('.'))
            .filter(|prefix| !prefix.is_empty());
        let Some(league_host) = league_host else {
            return Err(ImportError::config(format!(
                "CBS league URL must be a league subdomain of {}",
                self.host_suffix
            )));
        };
        let league_id = league_host.split('.').next().unwrap_or_default().to_string();
        Ok((url, league_id))
    }
}

struct CbsScript {
    rosters: Url,
    scoring: Url,
    league_id: String,
}

#[async_trait]
impl SessionScript for CbsScript {
    type Output = ScrapedLeague;

    async fn run(&self, nav: &mut Navigator<'_>) -> Result<ScrapedLeague> {
        let rosters = nav.open(&self.rosters).await?;
        let league_name = dom::extract_text(&rosters, LEAGUE_NAME)?;
        let teams = dom::extract_teams(&rosters, &ROSTERS)?;

        let scoring_page = nav.open(&self.scoring).await?;
        let scoring = dom::extract_scoring(&scoring_page, &SCORING)?;

        Ok(ScrapedLeague {
            league_id: self.league_id.clone(),
            league_name,
            teams,
            scoring,
        })
    }
}

#[async_trait]
impl PlatformAdapter for CbsAdapter {
    const PLATFORM: Platform = Platform::Cbs;

    type Options = CbsOptions;

    fn validate(&self, options: &CbsOptions, credentials: &Credentials) -> Result<()> {
        self.league(options)?;
        credentials.require_cookies(Self::PLATFORM, &[])
    }

    async fn acquire(
        &self,
        ctx: &AdapterContext<'_>,
        options: &CbsOptions,
        credentials: &Credentials,
    ) -> Result<RawPayload> {
        let (league_url, league_id) = self.league(options)?;
        let script = CbsScript {
            rosters: join(&league_url, ROSTERS_PATH)?,
            scoring: join(&league_url, SCORING_PATH)?,
            league_id,
        };
        let league = AutomatedSession::new(ctx, Self::PLATFORM, &LOGIN_MARKERS)
            .run(&league_url, credentials, &script)
            .await?;
        Ok(RawPayload::Cbs(league))
    }
}
