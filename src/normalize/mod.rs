//! Normalization: raw platform payloads to the canonical schema.
//!
//! Every function here is pure and total. Unknown fields are ignored; missing
//! or unmappable fields get a safe default and a [`NormalizationWarning`] on
//! the result instead of failing the import. A malformed player degrades that
//! player only.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::acquire::dom::ScrapedLeague;
use crate::model::{LeagueImportResult, NormalizationWarning};
use crate::platforms::sleeper::SleeperPayload;
use crate::types::{Platform, PlayerStatus, Position, RosterSlot};

mod scraped;
mod sleeper;
pub mod tables;


pub use tables::{table_for, MappingTable, MAPPING_VERSION};

/// Owner display name used when the source has none.
pub const DEFAULT_OWNER_NAME: &str = "Unknown Owner";

/// Everything an adapter collected, tagged by platform.
#[derive(Debug, Clone)]
pub enum RawPayload {
    Espn(ScrapedLeague),
    Yahoo(ScrapedLeague),
    Cbs(ScrapedLeague),
    Sleeper(SleeperPayload),
}

impl RawPayload {
    pub fn platform(&self) -> Platform {
        match self {
            RawPayload::Espn(_) => Platform::Espn,
            RawPayload::Yahoo(_) => Platform::Yahoo,
            RawPayload::Cbs(_) => Platform::Cbs,
            RawPayload::Sleeper(_) => Platform::Sleeper,
        }
    }
}

pub fn normalize(raw: RawPayload) -> LeagueImportResult {
    normalize_at(raw, Utc::now())
}

/// [`normalize`] with a fixed import timestamp.
pub fn normalize_at(raw: RawPayload, imported_at: DateTime<Utc>) -> LeagueImportResult {
    match raw {
        RawPayload::Espn(league) => scraped::normalize(Platform::Espn, league, imported_at),
        RawPayload::Yahoo(league) => scraped::normalize(Platform::Yahoo, league, imported_at),
        RawPayload::Cbs(league) => scraped::normalize(Platform::Cbs, league, imported_at),
        RawPayload::Sleeper(payload) => sleeper::normalize(payload, imported_at),
    }
}

/// Collects warnings for one result, logging each as it is recorded.
#[derive(Debug)]
pub(crate) struct Warnings {
    platform: Platform,
    items: Vec<NormalizationWarning>,
}

impl Warnings {
    pub(crate) fn new(platform: Platform) -> Self {
        Self {
            platform,
            items: Vec::new(),
        }
    }

    pub(crate) fn push(
        &mut self,
        team_id: Option<&str>,
        player_id: Option<&str>,
        field: &str,
        message: impl Into<String>,
    ) {
        let warning = NormalizationWarning {
            team_id: team_id.map(str::to_string),
            player_id: player_id.map(str::to_string),
            field: field.to_string(),
            message: message.into(),
        };
        debug!(
            platform = %self.platform,
            team_id = warning.team_id.as_deref(),
            player_id = warning.player_id.as_deref(),
            field = %warning.field,
            "{}",
            warning.message
        );
        self.items.push(warning);
    }

    pub(crate) fn league(&mut self, field: &str, message: impl Into<String>) {
        self.push(None, None, field, message);
    }

    pub(crate) fn team(&mut self, team_id: &str, field: &str, message: impl Into<String>) {
        self.push(Some(team_id), None, field, message);
    }

    pub(crate) fn player(
        &mut self,
        team_id: &str,
        player_id: Option<&str>,
        field: &str,
        message: impl Into<String>,
    ) {
        self.push(Some(team_id), player_id, field, message);
    }

    pub(crate) fn into_vec(self) -> Vec<NormalizationWarning> {
        self.items
    }
}

/// Per-player field mapping shared by the platform normalizers.
pub(crate) struct PlayerMapper<'a> {
    pub table: &'static MappingTable,
    pub warnings: &'a mut Warnings,
    pub team_id: &'a str,
    pub player_id: &'a str,
}

impl PlayerMapper<'_> {
    pub(crate) fn position(&mut self, raw: Option<&str>) -> Position {
        let Some(raw) = non_empty(raw) else {
            self.warn("position", "missing position");
            return Position::Unknown;
        };
        self.table.position(raw).unwrap_or_else(|| {
            self.warn("position", format!("unmapped position {raw:?}"));
            Position::Unknown
        })
    }

    pub(crate) fn slot(&mut self, raw: Option<&str>) -> RosterSlot {
        let Some(raw) = non_empty(raw) else {
            self.warn("rosterSlot", "missing lineup slot");
            return RosterSlot::Unknown;
        };
        self.table.slot(raw).unwrap_or_else(|| {
            self.warn("rosterSlot", format!("unmapped lineup slot {raw:?}"));
            RosterSlot::Unknown
        })
    }

    /// No designation means the player is healthy.
    pub(crate) fn status(&mut self, raw: Option<&str>) -> PlayerStatus {
        let Some(raw) = non_empty(raw) else {
            return PlayerStatus::Active;
        };
        self.table.status(raw).unwrap_or_else(|| {
            self.warn("status", format!("unmapped injury status {raw:?}"));
            PlayerStatus::Unknown
        })
    }

    fn warn(&mut self, field: &str, message: impl Into<String>) {
        self.warnings
            .player(self.team_id, Some(self.player_id), field, message);
    }
}

pub(crate) fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Upper-cased pro team abbreviation; free agents have none.
pub(crate) fn pro_team(raw: Option<&str>) -> Option<String> {
    match non_empty(raw) {
        None => None,
        Some(t) if t.eq_ignore_ascii_case("FA") || t == "--" => None,
        Some(t) => Some(t.to_ascii_uppercase()),
    }
}
