//! ESPN Fantasy Football adapter (automated session).
//!
//! Private ESPN leagues are only readable with the `SWID` and `espn_s2`
//! cookies of a signed-in session. The adapter loads the league settings page
//! (name, scoring) and the all-rosters page under those cookies.

use async_trait::async_trait;
use url::Url;

use super::{base_url, join, AdapterContext, PlatformAdapter};
use crate::acquire::dom::{self, RosterSelectors, ScoringSelectors, ScrapedLeague};
use crate::acquire::session::{AutomatedSession, LoginMarkers, Navigator, SessionScript};
use crate::config::ImportConfig;
use crate::credentials::Credentials;
use crate::error::{ImportError, Result};
use crate::normalize::RawPayload;
use crate::types::{Platform, Season};

/// Cookies ESPN requires for private leagues.
pub const REQUIRED_COOKIES: [&str; 2] = ["SWID", "espn_s2"];

pub const LOGIN_MARKERS: LoginMarkers = LoginMarkers {
    hosts: &["registerdisney.go.com"],
    path_fragments: &["/login"],
    form: Some("iframe#oneid-iframe"),
};

pub const LEAGUE_NAME: &str = ".league-settings .league-name";

pub const ROSTERS: RosterSelectors = RosterSelectors {
    team: "section.roster-team",
    team_id_attr: "data-team-id",
    team_name: ".teamName",
    team_owner: ".team-owner",
    player_row: "tr.Table__TR[data-player-id]",
    player_id_attr: "data-player-id",
    player_name: ".player-column__athlete",
    player_position: ".playerinfo__playerpos",
    player_pro_team: ".playerinfo__playerteam",
    player_slot: ".table--cell.slot",
    player_status: ".playerinfo__injurystatus",
};

pub const SCORING: ScoringSelectors = ScoringSelectors {
    row: "table.scoring-settings tr.scoring-item",
    stat: ".scoring-stat",
    points: ".scoring-points",
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EspnOptions {
    pub league_id: u32,
    pub season: Season,
}

pub struct EspnAdapter {
    base: Url,
}

impl EspnAdapter {
    pub fn new(config: &ImportConfig) -> Result<Self> {
        Ok(Self {
            base: base_url(&config.endpoints.espn)?,
        })
    }

    /// `{base}/football/league/{page}?leagueId={id}&seasonId={season}`
    fn page_url(&self, page: &str, options: &EspnOptions) -> Result<Url> {
        let mut url = join(&self.base, &format!("football/league/{page}"))?;
        url.query_pairs_mut()
            .append_pair("leagueId", &options.league_id.to_string())
            .append_pair("seasonId", &options.season.to_string());
        Ok(url)
    }
}

struct EspnScript {
    settings: Url,
    rosters: Url,
    league_id: String,
}

#[async_trait]
impl SessionScript for EspnScript {
    type Output = ScrapedLeague;

    async fn run(&self, nav: &mut Navigator<'_>) -> Result<ScrapedLeague> {
        let settings = nav.open(&self.settings).await?;
        let league_name = dom::extract_text(&settings, LEAGUE_NAME)?;
        let scoring = dom::extract_scoring(&settings, &SCORING)?;

        let rosters = nav.open(&self.rosters).await?;
        let teams = dom::extract_teams(&rosters, &ROSTERS)?;

        Ok(ScrapedLeague {
            league_id: self.league_id.clone(),
            league_name,
            teams,
            scoring,
        })
    }
}

#[async_trait]
impl PlatformAdapter for EspnAdapter {
    const PLATFORM: Platform = Platform::Espn;

    type Options = EspnOptions;

    fn validate(&self, options: &EspnOptions, credentials: &Credentials) -> Result<()> {
        if options.league_id == 0 {
            return Err(ImportError::config("ESPN league id must be a positive number"));
        }
        options.season.validate()?;
        credentials.require_cookies(Self::PLATFORM, &REQUIRED_COOKIES)
    }

    async fn acquire(
        &self,
        ctx: &AdapterContext<'_>,
        options: &EspnOptions,
        credentials: &Credentials,
    ) -> Result<RawPayload> {
        let script = EspnScript {
            settings: self.page_url("settings", options)?,
            rosters: self.page_url("rosters", options)?,
            league_id: options.league_id.to_string(),
        };
        let league = AutomatedSession::new(ctx, Self::PLATFORM, &LOGIN_MARKERS)
            .run(&self.base, credentials, &script)
            .await?;
        Ok(RawPayload::Espn(league))
    }
}
