//! Normalizer for DOM-scraped leagues (ESPN, Yahoo, CBS).

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use super::{non_empty, pro_team, table_for, PlayerMapper, Warnings, DEFAULT_OWNER_NAME};
use crate::acquire::dom::{ScrapedLeague, ScrapedPlayer, ScrapedScoringRule};
use crate::model::{LeagueImportResult, Player, ScoringSettings, Team};
use crate::normalize::MappingTable;
use crate::types::Platform;

pub(super) fn normalize(
    platform: Platform,
    league: ScrapedLeague,
    imported_at: DateTime<Utc>,
) -> LeagueImportResult {
    let table = table_for(platform);
    let mut warnings = Warnings::new(platform);
    let mut seen = HashSet::new();
    let mut teams = Vec::with_capacity(league.teams.len());

    for (index, raw) in league.teams.into_iter().enumerate() {
        let id = match non_empty(raw.id.as_deref()) {
            Some(id) => id.to_string(),
            None => {
                let id = format!("pos-{}", index + 1);
                warnings.team(&id, "id", "missing team id; using source position");
                id
            }
        };
        if !seen.insert(id.clone()) {
            warnings.team(&id, "id", "duplicate team id; later entry dropped");
            continue;
        }

        let name = match non_empty(raw.name.as_deref()) {
            Some(name) => name.to_string(),
            None => {
                warnings.team(&id, "name", "missing team name");
                format!("Team {id}")
            }
        };
        let owner_display_name = match non_empty(raw.owner.as_deref()) {
            Some(owner) => owner.to_string(),
            None => {
                warnings.team(&id, "ownerDisplayName", "missing owner display name");
                DEFAULT_OWNER_NAME.to_string()
            }
        };

        let roster = raw
            .players
            .into_iter()
            .filter_map(|p| player(table, &mut warnings, &id, p))
            .collect();

        teams.push(Team {
            id,
            name,
            owner_display_name,
            roster,
        });
    }

    let scoring_settings = scoring(league.scoring, &mut warnings);

    LeagueImportResult {
        source_platform: platform,
        league_id: league.league_id,
        league_name: non_empty(league.league_name.as_deref()).map(str::to_string),
        imported_at,
        teams,
        scoring_settings,
        raw_source_version: table.raw_source_version(),
        warnings: warnings.into_vec(),
    }
}

fn player(
    table: &'static MappingTable,
    warnings: &mut Warnings,
    team_id: &str,
    raw: ScrapedPlayer,
) -> Option<Player> {
    let Some(id) = non_empty(raw.id.as_deref()) else {
        warnings.player(team_id, None, "id", "player without id dropped");
        return None;
    };
    let Some(name) = non_empty(raw.name.as_deref()) else {
        warnings.player(team_id, Some(id), "name", "player without name dropped");
        return None;
    };

    let mut mapper = PlayerMapper {
        table,
        warnings,
        team_id,
        player_id: id,
    };
    Some(Player {
        id: id.to_string(),
        name: name.to_string(),
        position: mapper.position(raw.position.as_deref()),
        team: pro_team(raw.pro_team.as_deref()),
        roster_slot: mapper.slot(raw.slot.as_deref()),
        status: mapper.status(raw.status.as_deref()),
    })
}

fn scoring(rules: Vec<ScrapedScoringRule>, warnings: &mut Warnings) -> ScoringSettings {
    let mut settings = ScoringSettings::new();
    for rule in rules {
        let Some(stat) = non_empty(rule.stat.as_deref()).map(stat_key) else {
            warnings.league("scoringSettings", "scoring rule without a stat name");
            continue;
        };
        if stat.is_empty() {
            continue;
        }
        match non_empty(rule.points.as_deref()).and_then(parse_points) {
            Some(points) => {
                if settings.insert(stat.clone(), points).is_some() {
                    warnings.league("scoringSettings", format!("duplicate scoring rule {stat:?}"));
                }
            }
            None => warnings.league(
                "scoringSettings",
                format!("unreadable point value for {stat:?}"),
            ),
        }
    }
    settings
}

/// `"Passing TD"` -> `"passing_td"`
pub(crate) fn stat_key(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_lowercase());
        } else if !key.ends_with('_') {
            key.push('_');
        }
    }
    key.trim_matches('_').to_string()
}

/// Point cells read like `"4"`, `"+0.5"`, `"-2 pts"` or `"1,5"`.
pub(crate) fn parse_points(raw: &str) -> Option<f64> {
    let cleaned = raw
        .trim()
        .trim_end_matches("points")
        .trim_end_matches("pts")
        .trim()
        .trim_start_matches('+')
        .replace(',', ".");
    cleaned.parse::<f64>().ok().filter(|p| p.is_finite())
}
