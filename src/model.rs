//! Canonical, platform-agnostic league schema.
//!
//! This is the contract owed to downstream consumers (trade analyzer,
//! start/sit recommender). Field names serialize in camelCase and must only
//! change in a backward compatible way; normalization changes are signalled
//! through `raw_source_version`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::types::{Platform, PlayerStatus, Position, RosterSlot};


/// Stat category -> fantasy points per unit.
pub type ScoringSettings = BTreeMap<String, f64>;

/// One imported league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueImportResult {
    pub source_platform: Platform,
    /// Opaque, platform-defined league identifier
    pub league_id: String,
    pub league_name: Option<String>,
    pub imported_at: DateTime<Utc>,
    /// Source order, never empty on success
    pub teams: Vec<Team>,
    pub scoring_settings: ScoringSettings,
    pub raw_source_version: String,
    #[serde(default)]
    pub warnings: Vec<NormalizationWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub owner_display_name: String,
    /// Empty on bye weeks or unfilled rosters
    #[serde(default)]
    pub roster: Vec<Player>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Platform-native id; not comparable across platforms
    pub id: String,
    pub name: String,
    pub position: Position,
    /// Real-world pro team abbreviation, `None` for free agents
    pub team: Option<String>,
    pub roster_slot: RosterSlot,
    pub status: PlayerStatus,
}

/// A malformed or missing source field that was replaced with a safe default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationWarning {
    pub team_id: Option<String>,
    pub player_id: Option<String>,
    pub field: String,
    pub message: String,
}

impl LeagueImportResult {
    pub fn team(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn player_count(&self) -> usize {
        self.teams.iter().map(|t| t.roster.len()).sum()
    }

    /// `true` when both results describe the same league state, ignoring
    /// `imported_at`.
    pub fn same_content(&self, other: &LeagueImportResult) -> bool {
        self.source_platform == other.source_platform
            && self.league_id == other.league_id
            && self.teams == other.teams
            && self.scoring_settings == other.scoring_settings
    }

    /// Team ids that appear more than once. Empty for any normalized result.
    pub fn duplicate_team_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.teams
            .iter()
            .filter(|t| !seen.insert(t.id.as_str()))
            .map(|t| t.id.as_str())
            .collect()
    }
}
