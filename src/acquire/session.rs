//! Automated-session strategy: drive an isolated browser context through the
//! caller's authenticated session and scrape the league pages.
//!
//! Each attempt opens a fresh context from the shared pool, injects the
//! session cookies, runs the platform's [`SessionScript`] and closes the
//! context again, whatever the outcome. Transient failures get a new context
//! on retry; login redirects surface as `Authentication` immediately.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::acquire::browser::{BrowserError, ContextLease, Page};
use crate::acquire::dom;
use crate::core::retry::with_retry;
use crate::credentials::Credentials;
use crate::error::{ImportError, Result};
use crate::platforms::AdapterContext;
use crate::types::Platform;

/// How a platform's sign-in wall looks.
#[derive(Debug, Clone, Copy)]
pub struct LoginMarkers {
    /// Hosts that only ever serve sign-in pages
    pub hosts: &'static [&'static str],
    /// Path fragments of sign-in pages on the platform's own host
    pub path_fragments: &'static [&'static str],
    /// Selector of a sign-in form rendered in place of the requested page
    pub form: Option<&'static str>,
}

impl LoginMarkers {
    pub fn matches_url(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or_default();
        let path = url.path().to_ascii_lowercase();
        self.hosts.iter().any(|h| host.eq_ignore_ascii_case(h))
            || self.path_fragments.iter().any(|f| path.contains(f))
    }

    pub fn matches_page(&self, page: &Page) -> Result<bool> {
        if self.matches_url(&page.url) {
            return Ok(true);
        }
        match self.form {
            Some(css) => dom::has_match(page, css),
            None => Ok(false),
        }
    }
}

/// Page-level navigation handed to a [`SessionScript`].
pub struct Navigator<'a> {
    lease: &'a mut ContextLease,
    platform: Platform,
    login: &'a LoginMarkers,
    timeout: Duration,
}

impl Navigator<'_> {
    /// Navigate and classify the outcome. Every navigation is bounded by the
    /// configured navigation timeout.
    #[instrument(level = "debug", skip(self, url), fields(platform = %self.platform, path = url.path()))]
    pub async fn open(&mut self, url: &Url) -> Result<Page> {
        let page = match tokio::time::timeout(self.timeout, self.lease.goto(url)).await {
            Err(_) => {
                return Err(ImportError::transient(
                    self.platform,
                    format!(
                        "navigation to {} timed out after {}s",
                        url.path(),
                        self.timeout.as_secs()
                    ),
                ))
            }
            Ok(Err(e)) => return Err(classify_browser_error(self.platform, e)),
            Ok(Ok(page)) => page,
        };

        if self.login.matches_page(&page)? {
            return Err(ImportError::auth(
                self.platform,
                "login redirect detected; session cookies are invalid or expired",
            ));
        }

        match StatusCode::from_u16(page.status) {
            Ok(status) if status.is_success() => {
                debug!(status = page.status, bytes = page.html.len(), "page loaded");
                Ok(page)
            }
            Ok(status) => Err(ImportError::from_status(self.platform, status, url.path())),
            Err(_) => Err(ImportError::transient(
                self.platform,
                format!("{} returned an invalid status", url.path()),
            )),
        }
    }
}

/// The platform-specific part of a session: which pages to visit and what to
/// pull out of them.
#[async_trait]
pub trait SessionScript: Send + Sync {
    type Output: Send;

    async fn run(&self, nav: &mut Navigator<'_>) -> Result<Self::Output>;
}

pub fn classify_browser_error(platform: Platform, err: BrowserError) -> ImportError {
    match err {
        BrowserError::DetachedFrame => ImportError::transient(platform, "frame detached"),
        BrowserError::Closed => ImportError::transient(platform, "browser context closed"),
        // browser text can carry page content or URLs with tokens
        BrowserError::Navigation(_) => ImportError::transient(platform, "navigation failed"),
        BrowserError::Launch(_) => ImportError::transient(platform, "browser unavailable"),
    }
}

/// Automated-session acquisition for one platform.
pub struct AutomatedSession<'a> {
    ctx: &'a AdapterContext<'a>,
    platform: Platform,
    login: &'a LoginMarkers,
}

impl<'a> AutomatedSession<'a> {
    pub fn new(ctx: &'a AdapterContext<'a>, platform: Platform, login: &'a LoginMarkers) -> Self {
        Self {
            ctx,
            platform,
            login,
        }
    }

    /// Run `script` with retries. `origin` scopes the injected cookies.
    pub async fn run<S: SessionScript>(
        &self,
        origin: &Url,
        credentials: &Credentials,
        script: &S,
    ) -> Result<S::Output> {
        let label = format!("{} session", self.platform);
        with_retry(&self.ctx.config.retry, self.ctx.cancel, &label, move |attempt| {
            self.attempt(origin, credentials, script, attempt)
        })
        .await
    }

    #[instrument(skip(self, origin, credentials, script), fields(platform = %self.platform))]
    async fn attempt<S: SessionScript>(
        &self,
        origin: &Url,
        credentials: &Credentials,
        script: &S,
        attempt: u32,
    ) -> Result<S::Output> {
        self.ctx.attempts.fetch_add(1, Ordering::SeqCst);
        let platform = self.platform;
        let cancel = self.ctx.cancel;

        let mut lease = cancel
            .run(async {
                self.ctx
                    .pool
                    .open_context()
                    .await
                    .map_err(|e| classify_browser_error(platform, e))
            })
            .await?;

        let outcome = cancel
            .run(async {
                lease
                    .set_cookies(origin, credentials.cookies())
                    .await
                    .map_err(|e| classify_browser_error(platform, e))?;
                let mut nav = Navigator {
                    lease: &mut lease,
                    platform,
                    login: self.login,
                    timeout: self.ctx.config.navigation_timeout,
                };
                script.run(&mut nav).await
            })
            .await;

        lease.close().await;
        debug!(attempt, ok = outcome.is_ok(), "session attempt finished");
        outcome
    }
}
