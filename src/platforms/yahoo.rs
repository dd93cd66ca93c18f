//! Yahoo Fantasy Football adapter (automated session).
//!
//! Yahoo renders one roster per team page, so a session visits the league
//! standings to learn the team ids, then every team page, then the settings
//! page for scoring.

use async_trait::async_trait;
use std::collections::HashSet;
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
    hosts: &["login.yahoo.com"],
    path_fragments: &[],
    form: Some("form#login-username-form"),
};

pub const LEAGUE_NAME: &str = "#league-info .league-name";

/// Standings rows link to each team; the id sits on the row.
pub const STANDINGS_TEAM: &str = "#standingstable tr[data-team-id]";
pub const STANDINGS_TEAM_ID_ATTR: &str = "data-team-id";

pub const TEAM_PAGE: RosterSelectors = RosterSelectors {
    team: "#team-roster",
    team_id_attr: "data-team-id",
    team_name: ".team-name",
    team_owner: ".team-manager",
    player_row: "table.roster-table tr[data-player-id]",
    player_id_attr: "data-player-id",
    player_name: ".ysf-player-name a",
    player_position: ".player-position",
    player_pro_team: ".player-team",
    player_slot: ".pos-label",
    player_status: ".ysf-player-status",
};

pub const SCORING: ScoringSelectors = ScoringSelectors {
    row: "#settings-stat-mod table tr.stat-row",
    stat: ".stat-name",
    points: ".stat-value",
};

/// `<game>.l.<league>`, e.g. `449.l.12345` or `nfl.l.12345`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct YahooOptions {
    pub league_key: String,
}

impl YahooOptions {
    /// Split the key into `(game, league)`.
    pub fn parts(&self) -> Result<(&str, &str)> {
        let invalid = || {
            ImportError::config(format!(
                "Yahoo league key {:?} must look like <game>.l.<league>",
                self.league_key
            ))
        };
        let (game, league) = self.league_key.split_once(".l.").ok_or_else(invalid)?;
        let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        // `nfl` resolves to the current season's game key
        let game_ok = digits(game) || game.eq_ignore_ascii_case("nfl");
        if game_ok && digits(league) {
            Ok((game, league))
        } else {
            Err(invalid())
        }
    }
}

pub struct YahooAdapter {
    base: Url,
}

impl YahooAdapter {
    pub fn new(config: &ImportConfig) -> Result<Self> {
        Ok(Self {
            base: base_url(&config.endpoints.yahoo)?,
        })
    }
}

struct YahooScript {
    base: Url,
    league_id: String,
}

impl YahooScript {
    fn league_url(&self, rest: &str) -> Result<Url> {
        if rest.is_empty() {
            join(&self.base, &format!("f1/{}", self.league_id))
        } else {
            join(&self.base, &format!("f1/{}/{}", self.league_id, rest))
        }
    }
}

#[async_trait]
impl SessionScript for YahooScript {
    type Output = ScrapedLeague;

    async fn run(&self, nav: &mut Navigator<'_>) -> Result<ScrapedLeague> {
        let standings = nav.open(&self.league_url("")?).await?;
        let league_name = dom::extract_text(&standings, LEAGUE_NAME)?;
        let mut team_ids =
            dom::extract_attr_values(&standings, STANDINGS_TEAM, STANDINGS_TEAM_ID_ATTR)?;
        let mut seen = HashSet::new();
        team_ids.retain(|id| seen.insert(id.clone()));

        let mut teams = Vec::with_capacity(team_ids.len());
        for team_id in team_ids {
            let page = nav.open(&self.league_url(&team_id)?).await?;
            let mut team = dom::extract_teams(&page, &TEAM_PAGE)?
                .into_iter()
                .next()
                .unwrap_or_default();
            // the standings id is authoritative
            team.id = Some(team_id);
            teams.push(team);
        }

        let settings = nav.open(&self.league_url("settings")?).await?;
        let scoring = dom::extract_scoring(&settings, &SCORING)?;

        Ok(ScrapedLeague {
            league_id: self.league_id.clone(),
            league_name,
            teams,
            scoring,
        })
    }
}

#[async_trait]
impl PlatformAdapter for YahooAdapter {
    const PLATFORM: Platform = Platform::Yahoo;

    type Options = YahooOptions;

    fn validate(&self, options: &YahooOptions, credentials: &Credentials) -> Result<()> {
        options.parts()?;
        credentials.require_cookies(Self::PLATFORM, &[])
    }

    async fn acquire(
        &self,
        ctx: &AdapterContext<'_>,
        options: &YahooOptions,
        credentials: &Credentials,
    ) -> Result<RawPayload> {
        let (_, league_id) = options.parts()?;
        let script = YahooScript {
            base: self.base.clone(),
            league_id: league_id.to_string(),
        };
        let mut league = AutomatedSession::new(ctx, Self::PLATFORM, &LOGIN_MARKERS)
            .run(&self.base, credentials, &script)
            .await?;
        league.league_id = options.league_key.clone();
        Ok(RawPayload::Yahoo(league))
    }
}
