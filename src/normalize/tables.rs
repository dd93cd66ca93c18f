//! Versioned raw-vocabulary mapping tables, one per platform.
//!
//! Each platform's position, lineup-slot and injury vocabularies are closed
//! sets known in advance, so they are listed here explicitly. Bump
//! `MAPPING_VERSION` whenever an entry changes meaning; it is part of every
//! result's `raw_source_version`.

use crate::types::{Platform, PlayerStatus, Position, RosterSlot};

pub const MAPPING_VERSION: u32 = 1;

pub struct MappingTable {
    /// Acquisition source and its extraction version
    pub source: &'static str,
    pub version: u32,
    pub positions: &'static [(&'static str, Position)],
    pub slots: &'static [(&'static str, RosterSlot)],
    pub statuses: &'static [(&'static str, PlayerStatus)],
}

fn lookup<T: Copy>(table: &[(&str, T)], raw: &str) -> Option<T> {
    let raw = raw.trim();
    table
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(raw))
        .map(|(_, v)| *v)
}

impl MappingTable {
    pub fn raw_source_version(&self) -> String {
        format!("{}/map-v{}", self.source, self.version)
    }

    pub fn position(&self, raw: &str) -> Option<Position> {
        lookup(self.positions, raw)
    }

    pub fn slot(&self, raw: &str) -> Option<RosterSlot> {
        lookup(self.slots, raw)
    }

    pub fn status(&self, raw: &str) -> Option<PlayerStatus> {
        lookup(self.statuses, raw)
    }
}

pub fn table_for(platform: Platform) -> &'static MappingTable {
    match platform {
        Platform::Espn => &ESPN,
        Platform::Yahoo => &YAHOO,
        Platform::Sleeper => &SLEEPER,
        Platform::Cbs => &CBS,
    }
}

use PlayerStatus::{Active, Out, Questionable};
use Position::{DB, DEF, DL, K, LB, QB, RB, TE, WR};
use RosterSlot::{Bench, InjuredReserve, Starter, Taxi};

pub static ESPN: MappingTable = MappingTable {
    source: "espn-dom-v1",
    version: MAPPING_VERSION,
    positions: &[
        ("QB", QB),
        ("RB", RB),
        ("WR", WR),
        ("TE", TE),
        ("K", K),
        ("D/ST", DEF),
        ("DST", DEF),
        ("DL", DL),
        ("DE", DL),
        ("DT", DL),
        ("LB", LB),
        ("DB", DB),
        ("CB", DB),
        ("S", DB),
    ],
    slots: &[
        ("QB", Starter),
        ("RB", Starter),
        ("WR", Starter),
        ("TE", Starter),
        ("FLEX", Starter),
        ("RB/WR/TE", Starter),
        ("RB/WR", Starter),
        ("WR/TE", Starter),
        ("OP", Starter),
        ("K", Starter),
        ("D/ST", Starter),
        ("DL", Starter),
        ("LB", Starter),
        ("DB", Starter),
        ("DP", Starter),
        ("Bench", Bench),
        ("BE", Bench),
        ("IR", InjuredReserve),
    ],
    statuses: &[
        ("ACTIVE", Active),
        ("P", Active),
        ("PROBABLE", Active),
        ("Q", Questionable),
        ("QUESTIONABLE", Questionable),
        ("D", Questionable),
        ("DOUBTFUL", Questionable),
        ("O", Out),
        ("OUT", Out),
        ("IR", Out),
        ("INJURY_RESERVE", Out),
        ("SSPD", Out),
        ("SUSPENSION", Out),
    ],
};

pub static YAHOO: MappingTable = MappingTable {
    source: "yahoo-dom-v1",
    version: MAPPING_VERSION,
    positions: &[
        ("QB", QB),
        ("RB", RB),
        ("WR", WR),
        ("TE", TE),
        ("K", K),
        ("DEF", DEF),
        ("DL", DL),
        ("DE", DL),
        ("DT", DL),
        ("LB", LB),
        ("DB", DB),
        ("CB", DB),
        ("S", DB),
    ],
    slots: &[
        ("QB", Starter),
        ("RB", Starter),
        ("WR", Starter),
        ("TE", Starter),
        ("W/R/T", Starter),
        ("W/R", Starter),
        ("W/T", Starter),
        ("Q/W/R/T", Starter),
        ("K", Starter),
        ("DEF", Starter),
        ("D", Starter),
        ("DL", Starter),
        ("LB", Starter),
        ("DB", Starter),
        ("BN", Bench),
        ("IR", InjuredReserve),
        ("IR+", InjuredReserve),
        ("NA", InjuredReserve),
    ],
    statuses: &[
        ("P", Active),
        ("Q", Questionable),
        ("D", Questionable),
        ("O", Out),
        ("IR", Out),
        ("IR-R", Out),
        ("PUP-P", Out),
        ("PUP-R", Out),
        ("NFI-R", Out),
        ("SUSP", Out),
        ("NA", Out),
    ],
};

pub static CBS: MappingTable = MappingTable {
    source: "cbs-dom-v1",
    version: MAPPING_VERSION,
    positions: &[
        ("QB", QB),
        ("RB", RB),
        ("WR", WR),
        ("TE", TE),
        ("K", K),
        ("DST", DEF),
        ("DEF", DEF),
        ("DL", DL),
        ("LB", LB),
        ("DB", DB),
    ],
    slots: &[
        ("S", Starter),
        ("Starter", Starter),
        ("Active", Starter),
        ("R", Bench),
        ("Reserve", Bench),
        ("Bench", Bench),
        ("I", InjuredReserve),
        ("IR", InjuredReserve),
        ("Injured", InjuredReserve),
    ],
    statuses: &[
        ("Healthy", Active),
        ("Active", Active),
        ("P", Active),
        ("Probable", Active),
        ("Q", Questionable),
        ("Questionable", Questionable),
        ("D", Questionable),
        ("Doubtful", Questionable),
        ("O", Out),
        ("Out", Out),
        ("IR", Out),
        ("Injured Reserve", Out),
        ("Suspended", Out),
    ],
};

/// Sleeper lineup slots come from roster structure (`starters`, `reserve`,
/// `taxi`) rather than strings; the slot table names those lists.
pub static SLEEPER: MappingTable = MappingTable {
    source: "sleeper-api-v1",
    version: MAPPING_VERSION,
    positions: &[
        ("QB", QB),
        ("RB", RB),
        ("FB", RB),
        ("WR", WR),
        ("TE", TE),
        ("K", K),
        ("DEF", DEF),
        ("DL", DL),
        ("DE", DL),
        ("DT", DL),
        ("LB", LB),
        ("DB", DB),
        ("CB", DB),
        ("S", DB),
    ],
    slots: &[
        ("starters", Starter),
        ("players", Bench),
        ("reserve", InjuredReserve),
        ("taxi", Taxi),
    ],
    statuses: &[
        ("Questionable", Questionable),
        ("Doubtful", Questionable),
        ("Out", Out),
        ("IR", Out),
        ("PUP", Out),
        ("Sus", Out),
        ("COV", Out),
        ("NA", Out),
        ("DNR", Out),
    ],
};
