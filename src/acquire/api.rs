//! Hybrid-API strategy: direct reads against a platform's HTTP API, plus at
//! most one supplementary page fetch for fields the API does not expose.
//!
//! GETs are idempotent, so transient failures (network, 5xx, 429) are retried
//! under the shared policy. Any other 4xx is final.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::atomic::Ordering;
use tracing::{debug, instrument};
use url::Url;

use crate::acquire::browser::Page;
use crate::core::http::build_api_client;
use crate::core::retry::with_retry;
use crate::credentials::Credentials;
use crate::error::{ImportError, Result};
use crate::platforms::AdapterContext;
use crate::types::Platform;

/// API client for one import. Owns its connection pool, which is released
/// when the import returns.
pub struct HybridApi<'a> {
    client: Client,
    ctx: &'a AdapterContext<'a>,
    platform: Platform,
}

impl<'a> HybridApi<'a> {
    pub fn new(
        ctx: &'a AdapterContext<'a>,
        platform: Platform,
        credentials: &Credentials,
    ) -> Result<Self> {
        Ok(Self {
            client: build_api_client(ctx.config, credentials)?,
            ctx,
            platform,
        })
    }

    /// GET `url` and decode the JSON body, retrying transient failures.
    #[instrument(skip(self, url), fields(platform = %self.platform))]
    pub async fn get_json<T: DeserializeOwned + Send>(&self, url: Url, what: &str) -> Result<T> {
        let label = format!("{} {}", self.platform, what);
        with_retry(&self.ctx.config.retry, self.ctx.cancel, &label, |_| {
            let url = url.clone();
            async move {
                self.ctx.attempts.fetch_add(1, Ordering::SeqCst);
                let body = self.ctx.cancel.run(self.fetch_body(url, what)).await?;
                serde_json::from_str::<T>(&body)
                    .map_err(|e| ImportError::from_json(self.platform, &e, what))
            }
        })
        .await
    }

    async fn fetch_body(&self, url: Url, what: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImportError::from_http(self.platform, &e, what))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::from_status(self.platform, status, what));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ImportError::from_http(self.platform, &e, what))?;
        debug!(what, bytes = body.len(), "API response received");
        Ok(body)
    }

    /// One-shot page fetch for fields the API omits. Not retried: the caller
    /// treats a failed supplement as missing data, not as a failed import.
    #[instrument(skip(self, url), fields(platform = %self.platform))]
    pub async fn fetch_page(&self, url: Url, what: &str) -> Result<Page> {
        self.ctx.attempts.fetch_add(1, Ordering::SeqCst);
        let response = self
            .ctx
            .cancel
            .run(async {
                self.client
                    .get(url)
                    .header(reqwest::header::ACCEPT, "text/html")
                    .send()
                    .await
                    .map_err(|e| ImportError::from_http(self.platform, &e, what))
            })
            .await?;

        let final_url = response.url().clone();
        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::from_status(self.platform, status, what));
        }
        let html = self
            .ctx
            .cancel
            .run(async {
                response
                    .text()
                    .await
                    .map_err(|e| ImportError::from_http(self.platform, &e, what))
            })
            .await?;

        Ok(Page {
            url: final_url,
            status: status.as_u16(),
            html,
        })
    }
}
