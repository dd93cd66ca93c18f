//! Output flags, credential lookup and result rendering for the CLI.

use clap::Args;
use std::fmt::Write as _;
use zeroize::Zeroize;

use crate::credentials::{Credentials, Secret, SessionCookie};
use crate::error::Result;
use crate::model::LeagueImportResult;
use crate::types::Platform;

pub const ESPN_SWID_ENV_VAR: &str = "ESPN_SWID";
pub const ESPN_S2_ENV_VAR: &str = "ESPN_S2";
pub const YAHOO_COOKIE_ENV_VAR: &str = "YAHOO_COOKIE";
pub const CBS_COOKIE_ENV_VAR: &str = "CBS_COOKIE";
pub const SLEEPER_TOKEN_ENV_VAR: &str = "SLEEPER_TOKEN";

/// Flags shared by every import target
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output the full result as JSON instead of a summary.
    #[clap(long)]
    pub json: bool,

    /// Session cookie as `name=value` (repeatable; a whole `a=1; b=2` header
    /// also works). Overrides the platform's cookie env vars.
    #[clap(long = "cookie", value_name = "NAME=VALUE")]
    pub cookies: Vec<String>,
}

fn env_secret(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_cookie_header(mut raw: String) -> Result<Credentials> {
    let parsed = Credentials::from_cookie_header(&raw);
    raw.zeroize();
    parsed
}

/// Credentials for `platform`, from `--cookie` flags or the environment.
///
/// Returns `Credentials::None` when nothing is configured; the adapter then
/// rejects the import if its platform needs a session.
pub fn resolve_credentials(platform: Platform, mut cookies: Vec<String>) -> Result<Credentials> {
    if !cookies.is_empty() {
        let header = cookies.join("; ");
        cookies.zeroize();
        return parse_cookie_header(header);
    }

    let credentials = match platform {
        Platform::Espn => match (env_secret(ESPN_SWID_ENV_VAR), env_secret(ESPN_S2_ENV_VAR)) {
            (Some(swid), Some(s2)) => Credentials::SessionCookies(vec![
                SessionCookie::new("SWID", swid),
                SessionCookie::new("espn_s2", s2),
            ]),
            _ => Credentials::None,
        },
        Platform::Yahoo => match env_secret(YAHOO_COOKIE_ENV_VAR) {
            Some(header) => parse_cookie_header(header)?,
            None => Credentials::None,
        },
        Platform::Cbs => match env_secret(CBS_COOKIE_ENV_VAR) {
            Some(header) => parse_cookie_header(header)?,
            None => Credentials::None,
        },
        Platform::Sleeper => match env_secret(SLEEPER_TOKEN_ENV_VAR) {
            Some(token) => Credentials::ApiToken(Secret::new(token)),
            None => Credentials::None,
        },
    };
    Ok(credentials)
}

/// Human-readable league summary, one line per team.
pub fn render_summary(result: &LeagueImportResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} league {} ({}): {} teams, {} players",
        result.source_platform,
        result.league_id,
        result.league_name.as_deref().unwrap_or("unnamed"),
        result.teams.len(),
        result.player_count()
    );
    for team in &result.teams {
        let _ = writeln!(
            out,
            "  [{}] {} - {} ({} players)",
            team.id,
            team.name,
            team.owner_display_name,
            team.roster.len()
        );
    }
    if !result.scoring_settings.is_empty() {
        let _ = writeln!(out, "  scoring rules: {}", result.scoring_settings.len());
    }
    if !result.warnings.is_empty() {
        let _ = writeln!(out, "  warnings: {}", result.warnings.len());
        for w in &result.warnings {
            let _ = writeln!(
                out,
                "    {} (team {}, player {}): {}",
                w.field,
                w.team_id.as_deref().unwrap_or("-"),
                w.player_id.as_deref().unwrap_or("-"),
                w.message
            );
        }
    }
    out
}
