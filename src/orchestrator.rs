//! Import orchestration: dispatch, time budget, cancellation, coalescing.
//!
//! `Importer::import_league` is the single entry point. Identical concurrent
//! requests (same platform, same league, same caller) share one job. Every
//! job runs under a wall-clock budget; when it runs out the job is signalled
//! to stop, given a short grace period to release its browser context, and
//! the caller gets `ImportError::Timeout`.

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::acquire::{BrowserLauncher, BrowserPool, HttpLauncher};
use crate::config::ImportConfig;
use crate::core::cancellation;
use crate::credentials::Credentials;
use crate::error::{ImportError, Result};
use crate::model::LeagueImportResult;
use crate::platforms::{
    AdapterContext, CbsAdapter, EspnAdapter, ImportOptions, PlatformAdapter, SleeperAdapter,
    YahooAdapter,
};
use crate::types::Platform;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Lifecycle record of one import job. Every transition is logged.
#[derive(Debug, Clone, Serialize)]
pub struct ImportJob {
    pub id: u64,
    pub platform: Platform,
    pub target: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub attempts: u32,
}

impl ImportJob {
    fn new(id: u64, platform: Platform, target: String) -> Self {
        let job = Self {
            id,
            platform,
            target,
            status: JobStatus::Pending,
            created_at: Utc::now(),
            attempts: 0,
        };
        info!(job_id = job.id, platform = %job.platform, target = %job.target, status = %job.status, "import job created");
        job
    }

    fn start(&mut self) {
        self.status = JobStatus::Running;
        info!(job_id = self.id, platform = %self.platform, status = %self.status, "import job started");
    }

    fn finish(&mut self, outcome: &Result<LeagueImportResult>, attempts: u32, started: Instant) {
        self.attempts = attempts;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match outcome {
            Ok(result) => {
                self.status = JobStatus::Succeeded;
                info!(
                    job_id = self.id,
                    platform = %self.platform,
                    status = %self.status,
                    attempts,
                    elapsed_ms,
                    teams = result.teams.len(),
                    warnings = result.warnings.len(),
                    "import job finished"
                );
            }
            Err(e) => {
                self.status = JobStatus::Failed;
                warn!(
                    job_id = self.id,
                    platform = %self.platform,
                    status = %self.status,
                    attempts,
                    elapsed_ms,
                    kind = %e.kind(),
                    "import job failed: {e}"
                );
            }
        }
    }
}

/// Identifies requests that may share one job. The caller is identified by a
/// credential fingerprint, never by the credentials themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct JobKey {
    platform: Platform,
    target: String,
    caller: String,
}

type SharedJob = Shared<BoxFuture<'static, Result<LeagueImportResult>>>;

struct InFlight {
    job_id: u64,
    waiters: usize,
    future: SharedJob,
}

struct Inner {
    config: ImportConfig,
    pool: BrowserPool,
    in_flight: Mutex<HashMap<JobKey, InFlight>>,
    next_job_id: AtomicU64,
}

impl Inner {
    fn in_flight(&self) -> MutexGuard<'_, HashMap<JobKey, InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forget `job_id` if it still owns `key`.
    fn remove_job(&self, key: &JobKey, job_id: u64) {
        let mut map = self.in_flight();
        if map.get(key).is_some_and(|e| e.job_id == job_id) {
            map.remove(key);
        }
    }
}

/// Leaves the in-flight entry when a waiter goes away. The last waiter to
/// leave drops the job, which releases its browser context and credentials.
struct Waiter<'a> {
    inner: &'a Inner,
    key: &'a JobKey,
    job_id: u64,
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        let mut map = self.inner.in_flight();
        if let Entry::Occupied(mut entry) = map.entry(self.key.clone()) {
            if entry.get().job_id != self.job_id {
                return;
            }
            entry.get_mut().waiters -= 1;
            if entry.get().waiters == 0 {
                entry.remove();
            }
        }
    }
}

/// League importer. Cheap to clone; clones share the browser pool and the
/// in-flight job table.
#[derive(Clone)]
pub struct Importer {
    inner: Arc<Inner>,
}

impl Importer {
    /// Importer using the built-in HTTP page fetcher for automated sessions.
    pub fn new(config: ImportConfig) -> Result<Self> {
        let launcher = Arc::new(HttpLauncher {
            user_agent: config.user_agent.clone(),
            timeout: config.navigation_timeout,
        });
        Self::with_launcher(config, launcher)
    }

    pub fn with_launcher(config: ImportConfig, launcher: Arc<dyn BrowserLauncher>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                pool: BrowserPool::new(launcher),
                in_flight: Mutex::new(HashMap::new()),
                next_job_id: AtomicU64::new(1),
            }),
        })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.inner.config
    }

    pub fn browser_pool(&self) -> &BrowserPool {
        &self.inner.pool
    }

    /// Number of distinct jobs currently running.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight().len()
    }

    /// Import one league.
    ///
    /// `credentials` are used for this call only: they are dropped as soon as
    /// the job finishes (or immediately, when the request joins a job already
    /// in flight for the same caller).
    #[instrument(skip(self, options, credentials), fields(platform = %platform))]
    pub async fn import_league(
        &self,
        platform: Platform,
        options: ImportOptions,
        credentials: Credentials,
    ) -> Result<LeagueImportResult> {
        if options.platform() != platform {
            return Err(ImportError::config(format!(
                "{} options passed for a {} import",
                options.platform(),
                platform
            )));
        }

        let key = JobKey {
            platform,
            target: options.target_key(),
            caller: credentials.fingerprint(),
        };

        let (job_id, future) = {
            let mut map = self.inner.in_flight();
            match map.entry(key.clone()) {
                Entry::Occupied(mut entry) => {
                    let existing = entry.get_mut();
                    existing.waiters += 1;
                    info!(job_id = existing.job_id, waiters = existing.waiters, "joining in-flight import");
                    (existing.job_id, existing.future.clone())
                }
                Entry::Vacant(slot) => {
                    let job_id = self.inner.next_job_id.fetch_add(1, Ordering::SeqCst);
                    let future = run_job(
                        Arc::clone(&self.inner),
                        key.clone(),
                        job_id,
                        options,
                        credentials,
                    )
                    .boxed()
                    .shared();
                    slot.insert(InFlight {
                        job_id,
                        waiters: 1,
                        future: future.clone(),
                    });
                    (job_id, future)
                }
            }
        };

        let _waiter = Waiter {
            inner: &self.inner,
            key: &key,
            job_id,
        };
        future.await
    }

    /// Close the shared browser. Jobs still running fail with transient
    /// browser errors.
    pub async fn shutdown(&self) {
        info!(in_flight = self.in_flight(), "shutting down importer");
        self.inner.pool.shutdown().await;
    }
}

async fn run_job(
    inner: Arc<Inner>,
    key: JobKey,
    job_id: u64,
    options: ImportOptions,
    credentials: Credentials,
) -> Result<LeagueImportResult> {
    let mut job = ImportJob::new(job_id, key.platform, key.target.clone());
    let started = Instant::now();
    let budget = inner.config.job_budget;
    let (handle, cancel) = cancellation(budget);
    let attempts = AtomicU32::new(0);

    job.start();
    let outcome = {
        let ctx = AdapterContext {
            config: &inner.config,
            pool: &inner.pool,
            cancel: &cancel,
            attempts: &attempts,
        };
        let work = dispatch(&ctx, &options, &credentials);
        tokio::pin!(work);

        tokio::select! {
            res = &mut work => res,
            _ = tokio::time::sleep(budget) => {
                handle.cancel();
                if tokio::time::timeout(inner.config.cancel_grace, &mut work).await.is_err() {
                    warn!(job_id, "job did not stop within the cancel grace period");
                }
                Err(cancel.timeout_error())
            }
        }
    };
    drop(credentials);

    job.finish(&outcome, attempts.load(Ordering::SeqCst), started);
    inner.remove_job(&key, job_id);
    outcome
}

async fn dispatch(
    ctx: &AdapterContext<'_>,
    options: &ImportOptions,
    credentials: &Credentials,
) -> Result<LeagueImportResult> {
    match options {
        ImportOptions::Espn(o) => EspnAdapter::new(ctx.config)?.import(ctx, o, credentials).await,
        ImportOptions::Yahoo(o) => YahooAdapter::new(ctx.config)?.import(ctx, o, credentials).await,
        ImportOptions::Sleeper(o) => {
            SleeperAdapter::new(ctx.config)?
                .import(ctx, o, credentials)
                .await
        }
        ImportOptions::Cbs(o) => CbsAdapter::new(ctx.config)?.import(ctx, o, credentials).await,
    }
}
