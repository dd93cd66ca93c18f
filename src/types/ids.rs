//! Identifier and time types used by platform options.

use crate::error::{ImportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Earliest season any supported platform serves league data for.
pub const MIN_SEASON: u16 = 1990;
pub const MAX_SEASON: u16 = 2100;

/// Type-safe wrapper for Season years
///
/// # Examples
///
/// ```rust
/// use league_import::Season;
///
/// let season: Season = "2024".parse().unwrap();
/// assert_eq!(season.as_u16(), 2024);
/// assert!("1850".parse::<Season>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Season(pub u16);

impl Season {
    pub fn new(year: u16) -> Self {
        Self(year)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn validate(&self) -> Result<()> {
        if (MIN_SEASON..=MAX_SEASON).contains(&self.0) {
            Ok(())
        } else {
            Err(ImportError::config(format!(
                "season {} is outside {MIN_SEASON}..={MAX_SEASON}",
                self.0
            )))
        }
    }
}

impl Default for Season {
    fn default() -> Self {
        Self(2025)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Season {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self> {
        let year = s
            .trim()
            .parse::<u16>()
            .map_err(|_| ImportError::config(format!("season {s:?} is not a year")))?;
        let season = Self(year);
        season.validate()?;
        Ok(season)
    }
}
