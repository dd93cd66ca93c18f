//! Canonical player position, roster slot and status enums.
//!
//! These are the normalized vocabularies every platform maps onto. Raw
//! platform strings never leave the normalization layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fantasy football player positions.
///
/// Individual defensive players (DL, LB, DB) appear in IDP leagues; team
/// defenses are `DEF`.
///
/// # Examples
///
/// ```rust
/// use league_import::Position;
///
/// assert_eq!(Position::DEF.to_string(), "D/ST");
/// assert_eq!(Position::Unknown.to_string(), "UNKNOWN");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DEF,
    DL,
    LB,
    DB,
    Unknown,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DEF => "D/ST",
            Position::DL => "DL",
            Position::LB => "LB",
            Position::DB => "DB",
            Position::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Where a player sits on a fantasy roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RosterSlot {
    Starter,
    Bench,
    InjuredReserve,
    /// Sleeper dynasty taxi squad
    Taxi,
    Unknown,
}

impl fmt::Display for RosterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RosterSlot::Starter => "Starter",
            RosterSlot::Bench => "Bench",
            RosterSlot::InjuredReserve => "IR",
            RosterSlot::Taxi => "Taxi",
            RosterSlot::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

/// Game availability of a player.
///
/// Platforms publish finer designations (doubtful, probable, suspended, PUP);
/// those are folded into these four by the per-platform mapping tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Active,
    Questionable,
    Out,
    Unknown,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlayerStatus::Active => "Active",
            PlayerStatus::Questionable => "Questionable",
            PlayerStatus::Out => "Out",
            PlayerStatus::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_serde_names() {
        assert_eq!(serde_json::to_string(&Position::DEF).unwrap(), "\"DEF\"");
        assert_eq!(
            serde_json::to_string(&Position::Unknown).unwrap(),
            "\"UNKNOWN\""
        );
        let p: Position = serde_json::from_str("\"QB\"").unwrap();
        assert_eq!(p, Position::QB);
    }

    #[test]
    fn test_slot_and_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&RosterSlot::InjuredReserve).unwrap(),
            "\"injuredReserve\""
        );
        assert_eq!(
            serde_json::to_string(&PlayerStatus::Questionable).unwrap(),
            "\"questionable\""
        );
    }
}
