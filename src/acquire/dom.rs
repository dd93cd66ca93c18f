//! DOM extraction for the automated-session platforms.
//!
//! Extraction copies the text of whatever the selectors point at into
//! `Scraped*` records with every field optional. Interpreting missing or odd
//! values is left to `normalize`.
//!
//! `scraper::Html` is not `Send`, so every function here parses the page,
//! extracts owned data and drops the document before returning.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::acquire::browser::Page;
use crate::error::{ImportError, Result};

/// Raw league as rendered by ESPN, Yahoo or CBS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedLeague {
    pub league_id: String,
    pub league_name: Option<String>,
    pub teams: Vec<ScrapedTeam>,
    pub scoring: Vec<ScrapedScoringRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedTeam {
    pub id: Option<String>,
    pub name: Option<String>,
    pub owner: Option<String>,
    pub players: Vec<ScrapedPlayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPlayer {
    pub id: Option<String>,
    pub name: Option<String>,
    pub position: Option<String>,
    pub pro_team: Option<String>,
    pub slot: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedScoringRule {
    pub stat: Option<String>,
    pub points: Option<String>,
}

/// Where a platform renders its rosters.
///
/// `team` matches one element per fantasy team; all other team selectors are
/// relative to it. `player_row` matches one element per rostered player; all
/// player selectors are relative to the row.
#[derive(Debug, Clone, Copy)]
pub struct RosterSelectors {
    pub team: &'static str,
    pub team_id_attr: &'static str,
    pub team_name: &'static str,
    pub team_owner: &'static str,
    pub player_row: &'static str,
    pub player_id_attr: &'static str,
    pub player_name: &'static str,
    pub player_position: &'static str,
    pub player_pro_team: &'static str,
    pub player_slot: &'static str,
    pub player_status: &'static str,
}

/// Where a platform renders its scoring table.
#[derive(Debug, Clone, Copy)]
pub struct ScoringSelectors {
    pub row: &'static str,
    pub stat: &'static str,
    pub points: &'static str,
}

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| ImportError::config(format!("invalid selector {css:?}")))
}

/// Collapsed, trimmed text content; `None` when empty.
fn text_of(el: ElementRef<'_>) -> Option<String> {
    let text = el.text().collect::<Vec<_>>().join(" ");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

fn first_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope.select(sel).next().and_then(text_of)
}

fn attr_of(el: ElementRef<'_>, attr: &str) -> Option<String> {
    el.value()
        .attr(attr)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Text of the first element matching `css` anywhere on the page.
pub fn extract_text(page: &Page, css: &str) -> Result<Option<String>> {
    let sel = selector(css)?;
    let doc = Html::parse_document(&page.html);
    let found = doc.select(&sel).next().and_then(text_of);
    Ok(found)
}

/// Attribute values of every element matching `css`, in document order.
pub fn extract_attr_values(page: &Page, css: &str, attr: &str) -> Result<Vec<String>> {
    let sel = selector(css)?;
    let doc = Html::parse_document(&page.html);
    let values = doc.select(&sel).filter_map(|el| attr_of(el, attr)).collect();
    Ok(values)
}

/// `(attribute, text)` pairs of every element matching `css`.
pub fn extract_attr_text_pairs(page: &Page, css: &str, attr: &str) -> Result<Vec<(String, String)>> {
    let sel = selector(css)?;
    let doc = Html::parse_document(&page.html);
    let pairs = doc
        .select(&sel)
        .filter_map(|el| Some((attr_of(el, attr)?, text_of(el)?)))
        .collect();
    Ok(pairs)
}

pub fn extract_teams(page: &Page, s: &RosterSelectors) -> Result<Vec<ScrapedTeam>> {
    let team_sel = selector(s.team)?;
    let name_sel = selector(s.team_name)?;
    let owner_sel = selector(s.team_owner)?;
    let row_sel = selector(s.player_row)?;
    let player_name_sel = selector(s.player_name)?;
    let position_sel = selector(s.player_position)?;
    let pro_team_sel = selector(s.player_pro_team)?;
    let slot_sel = selector(s.player_slot)?;
    let status_sel = selector(s.player_status)?;

    let doc = Html::parse_document(&page.html);
    let teams = doc
        .select(&team_sel)
        .map(|team| ScrapedTeam {
            id: attr_of(team, s.team_id_attr),
            name: first_text(team, &name_sel),
            owner: first_text(team, &owner_sel),
            players: team
                .select(&row_sel)
                .map(|row| ScrapedPlayer {
                    id: attr_of(row, s.player_id_attr),
                    name: first_text(row, &player_name_sel),
                    position: first_text(row, &position_sel),
                    pro_team: first_text(row, &pro_team_sel),
                    slot: first_text(row, &slot_sel),
                    status: first_text(row, &status_sel),
                })
                .collect(),
        })
        .collect();
    Ok(teams)
}

pub fn extract_scoring(page: &Page, s: &ScoringSelectors) -> Result<Vec<ScrapedScoringRule>> {
    let row_sel = selector(s.row)?;
    let stat_sel = selector(s.stat)?;
    let points_sel = selector(s.points)?;

    let doc = Html::parse_document(&page.html);
    let rules = doc
        .select(&row_sel)
        .map(|row| ScrapedScoringRule {
            stat: first_text(row, &stat_sel),
            points: first_text(row, &points_sel),
        })
        .collect();
    Ok(rules)
}

/// `true` when `css` matches anything on the page.
pub fn has_match(page: &Page, css: &str) -> Result<bool> {
    let sel = selector(css)?;
    let doc = Html::parse_document(&page.html);
    let found = doc.select(&sel).next().is_some();
    Ok(found)
}
