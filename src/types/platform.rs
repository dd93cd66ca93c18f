//! The closed set of supported platforms.

use crate::error::ImportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// External fantasy platform a league is imported from.
///
/// Adding a variant forces every `match` on it (adapter selection,
/// normalization, mapping tables) to be revisited at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Espn,
    Yahoo,
    Sleeper,
    Cbs,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Espn,
        Platform::Yahoo,
        Platform::Sleeper,
        Platform::Cbs,
    ];

    /// Lowercase identifier used in keys, config and the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Espn => "espn",
            Platform::Yahoo => "yahoo",
            Platform::Sleeper => "sleeper",
            Platform::Cbs => "cbs",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Platform::Espn => "ESPN",
            Platform::Yahoo => "Yahoo",
            Platform::Sleeper => "Sleeper",
            Platform::Cbs => "CBS",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Platform {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "espn" => Ok(Platform::Espn),
            "yahoo" => Ok(Platform::Yahoo),
            "sleeper" => Ok(Platform::Sleeper),
            "cbs" | "cbssports" => Ok(Platform::Cbs),
            _ => Err(ImportError::config(format!("unknown platform {s:?}"))),
        }
    }
}
