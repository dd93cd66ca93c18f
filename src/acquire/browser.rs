//! Headless browser abstraction and the process-wide browser pool.
//!
//! A [`Browser`] is launched once, lazily, and then shared read-only by every
//! concurrent import. The only operation invoked concurrently on it is
//! [`Browser::new_context`], which must return a context isolated from all
//! others (own cookie store, own navigation state). Contexts are handed out as
//! [`ContextLease`]s so the pool can account for every open context.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use url::Url;
use zeroize::Zeroize;

use crate::credentials::SessionCookie;

/// Raw, unclassified browser failure. Classified into an `ImportError` by the
/// session strategy before it leaves the adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrowserError {
    #[error("browser could not be launched: {0}")]
    Launch(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("frame was detached during navigation")]
    DetachedFrame,

    #[error("browser context is closed")]
    Closed,
}

/// A rendered page after all redirects were followed.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL, which reveals login redirects
    pub url: Url,
    pub status: u16,
    pub html: String,
}

/// One isolated browsing context (incognito-style profile).
#[async_trait]
pub trait BrowserContext: Send {
    async fn set_cookies(
        &mut self,
        origin: &Url,
        cookies: &[SessionCookie],
    ) -> Result<(), BrowserError>;

    async fn goto(&mut self, url: &Url) -> Result<Page, BrowserError>;

    async fn close(self: Box<Self>);
}

#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_context(&self) -> Result<Box<dyn BrowserContext>, BrowserError>;

    async fn shutdown(&self) {}
}

/// Starts the shared browser on first use.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Arc<dyn Browser>, BrowserError>;
}

/// Lazily initialized, process-wide browser owned by the importer.
pub struct BrowserPool {
    launcher: Arc<dyn BrowserLauncher>,
    browser: OnceCell<Arc<dyn Browser>>,
    open: Arc<AtomicUsize>,
}

impl BrowserPool {
    pub fn new(launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self {
            launcher,
            browser: OnceCell::new(),
            open: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn is_launched(&self) -> bool {
        self.browser.initialized()
    }

    /// Contexts handed out and not yet closed or dropped.
    pub fn open_contexts(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    async fn browser(&self) -> Result<&Arc<dyn Browser>, BrowserError> {
        self.browser
            .get_or_try_init(|| async {
                debug!("launching shared browser");
                self.launcher.launch().await
            })
            .await
    }

    pub async fn open_context(&self) -> Result<ContextLease, BrowserError> {
        let context = self.browser().await?.new_context().await?;
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(ContextLease {
            inner: Some(context),
            open: Arc::clone(&self.open),
        })
    }

    pub async fn shutdown(&self) {
        if let Some(browser) = self.browser.get() {
            browser.shutdown().await;
        }
    }
}

/// An open context checked out of the pool.
///
/// `close` releases it properly. Dropping it without closing (for example when
/// an aborted job is torn down) is logged and the close is spawned onto the
/// current runtime, so the context never outlives its job.
pub struct ContextLease {
    inner: Option<Box<dyn BrowserContext>>,
    open: Arc<AtomicUsize>,
}

impl ContextLease {
    pub async fn set_cookies(
        &mut self,
        origin: &Url,
        cookies: &[SessionCookie],
    ) -> Result<(), BrowserError> {
        match self.inner.as_mut() {
            Some(ctx) => ctx.set_cookies(origin, cookies).await,
            None => Err(BrowserError::Closed),
        }
    }

    pub async fn goto(&mut self, url: &Url) -> Result<Page, BrowserError> {
        match self.inner.as_mut() {
            Some(ctx) => ctx.goto(url).await,
            None => Err(BrowserError::Closed),
        }
    }

    pub async fn close(mut self) {
        if let Some(ctx) = self.inner.take() {
            ctx.close().await;
            self.open.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for ContextLease {
    fn drop(&mut self) {
        let Some(ctx) = self.inner.take() else {
            return;
        };
        self.open.fetch_sub(1, Ordering::SeqCst);
        warn!("browser context dropped without an orderly close");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(ctx.close());
            }
            Err(_) => warn!("no runtime to close dropped browser context; leaking it"),
        }
    }
}

/// Built-in headless page fetcher.
///
/// Each context is its own `reqwest::Client` with a private cookie jar, so
/// sessions of concurrent imports never see each other's cookies.
pub struct HttpBrowser {
    user_agent: String,
    timeout: Duration,
}

impl HttpBrowser {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn new_context(&self) -> Result<Box<dyn BrowserContext>, BrowserError> {
        let jar = Arc::new(reqwest::cookie::Jar::default());
        let client = reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .cookie_provider(Arc::clone(&jar))
            .redirect(Policy::limited(10))
            .timeout(self.timeout)
            .build()
            .map_err(|_| BrowserError::Launch("HTTP client could not be built".to_string()))?;
        Ok(Box::new(HttpContext { client, jar }))
    }
}

struct HttpContext {
    client: reqwest::Client,
    jar: Arc<reqwest::cookie::Jar>,
}

#[async_trait]
impl BrowserContext for HttpContext {
    async fn set_cookies(
        &mut self,
        origin: &Url,
        cookies: &[SessionCookie],
    ) -> Result<(), BrowserError> {
        for cookie in cookies {
            let mut raw = format!("{}={}; Path=/", cookie.name, cookie.value());
            self.jar.add_cookie_str(&raw, origin);
            raw.zeroize();
        }
        Ok(())
    }

    async fn goto(&mut self, url: &Url) -> Result<Page, BrowserError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| BrowserError::Navigation(describe(&e)))?;
        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let html = response
            .text()
            .await
            .map_err(|e| BrowserError::Navigation(describe(&e)))?;
        Ok(Page {
            url: final_url,
            status,
            html,
        })
    }

    async fn close(self: Box<Self>) {}
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "timed out".to_string()
    } else if err.is_connect() {
        "connection failed".to_string()
    } else if err.is_redirect() {
        "redirect loop".to_string()
    } else {
        "request failed".to_string()
    }
}

/// Launches an [`HttpBrowser`].
pub struct HttpLauncher {
    pub user_agent: String,
    pub timeout: Duration,
}

#[async_trait]
impl BrowserLauncher for HttpLauncher {
    async fn launch(&self) -> Result<Arc<dyn Browser>, BrowserError> {
        Ok(Arc::new(HttpBrowser::new(self.user_agent.clone(), self.timeout)))
    }
}
