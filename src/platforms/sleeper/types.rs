//! Raw Sleeper API shapes.
//!
//! Every field the normalizer can live without is optional or defaulted, and
//! unknown fields are ignored, so schema additions on Sleeper's side never
//! fail an import.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Scoring values are numbers in practice; anything else is skipped rather
/// than failing the whole league.
fn de_numeric_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Deserialize::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| v.as_f64().map(|f| (k, f)))
        .collect())
}

/// `GET /league/{league_id}`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SleeperLeague {
    pub league_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_rosters: Option<u32>,
    #[serde(default)]
    pub roster_positions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de_numeric_map")]
    pub scoring_settings: BTreeMap<String, f64>,
}

/// One element of `GET /league/{league_id}/rosters`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SleeperRoster {
    pub roster_id: u32,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub players: Option<Vec<String>>,
    /// Lineup order; `"0"` marks an empty starting slot
    #[serde(default)]
    pub starters: Option<Vec<String>>,
    #[serde(default)]
    pub reserve: Option<Vec<String>>,
    #[serde(default)]
    pub taxi: Option<Vec<String>>,
}

/// One element of `GET /league/{league_id}/users`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SleeperUser {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub metadata: Option<SleeperUserMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SleeperUserMetadata {
    #[serde(default)]
    pub team_name: Option<String>,
}

/// Value of the `GET /players/nfl` catalog map
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SleeperPlayer {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub injury_status: Option<String>,
}

/// Player id -> player
pub type PlayerCatalog = HashMap<String, SleeperPlayer>;

/// Everything one Sleeper import collected before normalization.
#[derive(Debug, Clone, Default)]
pub struct SleeperPayload {
    pub league: SleeperLeague,
    pub rosters: Vec<SleeperRoster>,
    pub users: Vec<SleeperUser>,
    pub players: PlayerCatalog,
    /// Owner id -> display name, scraped from the league page when the users
    /// endpoint left owners unnamed
    pub scraped_owner_names: HashMap<String, String>,
}

impl SleeperPayload {
    /// Owner ids of rosters whose owner has no display name in `users`.
    pub fn unnamed_owner_ids(&self) -> Vec<String> {
        self.rosters
            .iter()
            .filter_map(|r| r.owner_id.as_deref())
            .filter(|owner| {
                !self.users.iter().any(|u| {
                    u.user_id == *owner
                        && u.display_name.as_deref().is_some_and(|n| !n.trim().is_empty())
                })
            })
            .map(str::to_string)
            .collect()
    }
}
