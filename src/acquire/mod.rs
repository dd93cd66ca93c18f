//! Acquisition strategies: how raw league data is obtained.
//!
//! - `browser`: headless browser abstraction and the shared browser pool
//! - `session`: automated-session strategy (ESPN, Yahoo, CBS)
//! - `dom`: selector-driven extraction of rendered league pages
//! - `api`: hybrid-API strategy (Sleeper)

pub mod api;
pub mod browser;
pub mod dom;
pub mod session;

pub use browser::{
    Browser, BrowserContext, BrowserError, BrowserLauncher, BrowserPool, ContextLease,
    HttpBrowser, HttpLauncher, Page,
};
pub use dom::{ScrapedLeague, ScrapedPlayer, ScrapedScoringRule, ScrapedTeam};
pub use session::{AutomatedSession, LoginMarkers, Navigator, SessionScript};
