//! CLI argument definitions and parsing.

pub mod args;


use clap::{Parser, Subcommand};

use crate::platforms::{CbsOptions, EspnOptions, ImportOptions, SleeperOptions, YahooOptions};
use crate::types::{Platform, Season};
pub use args::{render_summary, resolve_credentials, OutputArgs};

/// Env var holding the default ESPN league id.
pub const LEAGUE_ID_ENV_VAR: &str = "ESPN_FFL_LEAGUE_ID";

#[derive(Debug, Parser)]
#[clap(
    name = "league-import",
    about = "Import fantasy football leagues from ESPN, Yahoo, Sleeper and CBS"
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[clap(long, global = true)]
    pub log_json: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import one league and print the normalized result
    Import {
        #[clap(subcommand)]
        target: ImportTarget,
    },
}

#[derive(Debug, Subcommand)]
pub enum ImportTarget {
    /// ESPN league (needs `ESPN_SWID` and `ESPN_S2`, or `--cookie`)
    Espn {
        /// League ID (or set `ESPN_FFL_LEAGUE_ID` env var).
        #[clap(long, short, env = LEAGUE_ID_ENV_VAR)]
        league_id: u32,

        /// Season year (e.g. 2025).
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        #[clap(flatten)]
        output: OutputArgs,
    },

    /// Yahoo league (needs `YAHOO_COOKIE`, or `--cookie`)
    Yahoo {
        /// League key, `<game>.l.<league>` (e.g. 449.l.12345).
        #[clap(long, short = 'k')]
        league_key: String,

        #[clap(flatten)]
        output: OutputArgs,
    },

    /// Sleeper league (public; `SLEEPER_TOKEN` is sent when set)
    Sleeper {
        /// Numeric league ID.
        #[clap(long, short)]
        league_id: String,

        #[clap(flatten)]
        output: OutputArgs,
    },

    /// CBS league (needs `CBS_COOKIE`, or `--cookie`)
    Cbs {
        /// League URL, e.g. https://myleague.football.cbssports.com
        #[clap(long, short = 'u')]
        league_url: String,

        #[clap(flatten)]
        output: OutputArgs,
    },
}

impl ImportTarget {
    /// Split into the platform, its options and the output flags.
    pub fn into_parts(self) -> (Platform, ImportOptions, OutputArgs) {
        match self {
            ImportTarget::Espn {
                league_id,
                season,
                output,
            } => (
                Platform::Espn,
                ImportOptions::Espn(EspnOptions { league_id, season }),
                output,
            ),
            ImportTarget::Yahoo { league_key, output } => (
                Platform::Yahoo,
                ImportOptions::Yahoo(YahooOptions { league_key }),
                output,
            ),
            ImportTarget::Sleeper { league_id, output } => (
                Platform::Sleeper,
                ImportOptions::Sleeper(SleeperOptions { league_id }),
                output,
            ),
            ImportTarget::Cbs { league_url, output } => (
                Platform::Cbs,
                ImportOptions::Cbs(CbsOptions { league_url }),
                output,
            ),
        }
    }
}
