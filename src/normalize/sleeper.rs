//! Normalizer for Sleeper API payloads.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use super::{non_empty, pro_team, table_for, PlayerMapper, Warnings, DEFAULT_OWNER_NAME};
use crate::model::{LeagueImportResult, Player, Team};
use crate::platforms::sleeper::{SleeperPayload, SleeperPlayer, SleeperRoster, SleeperUser};
use crate::types::{Platform, Position, PlayerStatus, RosterSlot};

/// Marks an unfilled starting slot in `starters`.
const EMPTY_SLOT: &str = "0";

pub(super) fn normalize(payload: SleeperPayload, imported_at: DateTime<Utc>) -> LeagueImportResult {
    let table = table_for(Platform::Sleeper);
    let mut warnings = Warnings::new(Platform::Sleeper);

    let users: HashMap<&str, &SleeperUser> = payload
        .users
        .iter()
        .map(|u| (u.user_id.as_str(), u))
        .collect();

    let mut seen = HashSet::new();
    let mut teams = Vec::with_capacity(payload.rosters.len());

    for roster in &payload.rosters {
        let id = roster.roster_id.to_string();
        if !seen.insert(roster.roster_id) {
            warnings.team(&id, "id", "duplicate roster id; later entry dropped");
            continue;
        }

        let owner_id = non_empty(roster.owner_id.as_deref());
        let user = owner_id.and_then(|o| users.get(o).copied());

        let owner = user
            .and_then(|u| non_empty(u.display_name.as_deref()))
            .or_else(|| owner_id.and_then(|o| non_empty(payload.scraped_owner_names.get(o).map(String::as_str))));
        let owner_display_name = match owner {
            Some(name) => name.to_string(),
            None => {
                let message = if owner_id.is_some() {
                    "owner display name missing from API and league page"
                } else {
                    "roster has no owner"
                };
                warnings.team(&id, "ownerDisplayName", message);
                DEFAULT_OWNER_NAME.to_string()
            }
        };

        let name = user
            .and_then(|u| u.metadata.as_ref())
            .and_then(|m| non_empty(m.team_name.as_deref()))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Team {id}"));

        let roster_players = roster_players(roster, &payload.players, &id, &mut warnings);

        teams.push(Team {
            id,
            name,
            owner_display_name,
            roster: roster_players,
        });
    }

    LeagueImportResult {
        source_platform: Platform::Sleeper,
        league_id: payload.league.league_id,
        league_name: non_empty(payload.league.name.as_deref()).map(str::to_string),
        imported_at,
        teams,
        scoring_settings: payload.league.scoring_settings,
        raw_source_version: table.raw_source_version(),
        warnings: warnings.into_vec(),
    }
}

fn id_set(ids: &Option<Vec<String>>) -> HashSet<&str> {
    ids.iter()
        .flatten()
        .map(String::as_str)
        .filter(|id| *id != EMPTY_SLOT)
        .collect()
}

/// Starters in lineup order, then everyone else in roster order.
fn roster_players(
    roster: &SleeperRoster,
    catalog: &HashMap<String, SleeperPlayer>,
    team_id: &str,
    warnings: &mut Warnings,
) -> Vec<Player> {
    let starters = id_set(&roster.starters);
    let reserve = id_set(&roster.reserve);
    let taxi = id_set(&roster.taxi);

    let ordered = roster
        .starters
        .iter()
        .flatten()
        .chain(roster.players.iter().flatten())
        .chain(roster.reserve.iter().flatten())
        .chain(roster.taxi.iter().flatten())
        .map(|id| id.trim())
        .filter(|id| !id.is_empty() && *id != EMPTY_SLOT);

    let mut seen = HashSet::new();
    let mut players = Vec::new();
    for id in ordered {
        if !seen.insert(id) {
            continue;
        }
        let slot = if starters.contains(id) {
            RosterSlot::Starter
        } else if reserve.contains(id) {
            RosterSlot::InjuredReserve
        } else if taxi.contains(id) {
            RosterSlot::Taxi
        } else {
            RosterSlot::Bench
        };
        players.push(player(id, slot, catalog.get(id), team_id, warnings));
    }
    players
}

fn player(
    id: &str,
    roster_slot: RosterSlot,
    entry: Option<&SleeperPlayer>,
    team_id: &str,
    warnings: &mut Warnings,
) -> Player {
    let Some(entry) = entry else {
        warnings.player(team_id, Some(id), "name", "player missing from catalog");
        return Player {
            id: id.to_string(),
            name: format!("Player {id}"),
            position: Position::Unknown,
            team: None,
            roster_slot,
            status: PlayerStatus::Unknown,
        };
    };

    let name = match non_empty(entry.full_name.as_deref()) {
        Some(full) => full.to_string(),
        None => {
            let parts: Vec<&str> = [entry.first_name.as_deref(), entry.last_name.as_deref()]
                .into_iter()
                .filter_map(non_empty)
                .collect();
            if parts.is_empty() {
                warnings.player(team_id, Some(id), "name", "catalog entry has no name");
                format!("Player {id}")
            } else {
                parts.join(" ")
            }
        }
    };

    let mut mapper = PlayerMapper {
        table: table_for(Platform::Sleeper),
        warnings,
        team_id,
        player_id: id,
    };
    Player {
        id: id.to_string(),
        name,
        position: mapper.position(entry.position.as_deref()),
        team: pro_team(entry.team.as_deref()),
        roster_slot,
        status: mapper.status(entry.injury_status.as_deref()),
    }
}
