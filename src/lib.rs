//! Fantasy League Import Library
//!
//! Imports a fantasy football league from ESPN, Yahoo, Sleeper or CBS and
//! normalizes it into one platform-agnostic schema (`LeagueImportResult`).
//!
//! ## Features
//!
//! - **Automated Sessions**: ESPN, Yahoo and CBS league pages are read through a
//!   pooled browser session, with login redirects detected and reported
//! - **Hybrid API**: Sleeper is read from its public API, topped up from the
//!   league page when owner names are missing
//! - **Normalization**: Positions, roster slots and injury statuses mapped through
//!   versioned per-platform tables; anything unmappable becomes a warning
//! - **Orchestration**: Retries with backoff, a wall-clock budget per import,
//!   cancellation and coalescing of identical concurrent requests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use league_import::{Credentials, ImportConfig, ImportOptions, Importer, Platform, SleeperOptions};
//!
//! # async fn example() -> league_import::Result<()> {
//! let importer = Importer::new(ImportConfig::default())?;
//! let league = importer
//!     .import_league(
//!         Platform::Sleeper,
//!         ImportOptions::Sleeper(SleeperOptions {
//!             league_id: "784512398765432100".to_string(),
//!         }),
//!         Credentials::None,
//!     )
//!     .await?;
//!
//! for team in &league.teams {
//!     println!("{} ({}): {} players", team.name, team.owner_display_name, team.roster.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod acquire;
pub mod cli;
pub mod config;
pub mod core;
pub mod credentials;
pub mod error;
pub mod model;
pub mod normalize;
pub mod orchestrator;
pub mod platforms;
pub mod types;

// Re-export commonly used types
pub use config::ImportConfig;
pub use credentials::{Credentials, Secret, SessionCookie};
pub use error::{ErrorKind, ImportError, Result};
pub use model::{LeagueImportResult, NormalizationWarning, Player, ScoringSettings, Team};
pub use orchestrator::{ImportJob, Importer, JobStatus};
pub use platforms::{CbsOptions, EspnOptions, ImportOptions, SleeperOptions, YahooOptions};
pub use types::{Platform, PlayerStatus, Position, RosterSlot, Season};
