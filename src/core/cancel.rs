//! Cancellation signal for one import job.
//!
//! The orchestrator holds the [`CancelHandle`]; adapters receive a
//! [`Cancellation`] and race every suspension point (navigation, HTTP call,
//! backoff sleep) against it. Once raised, the pending operation is dropped
//! and the caller gets `ImportError::Timeout`.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

use crate::error::{ImportError, Result};

pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

#[derive(Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
    budget: Duration,
}

/// Create a linked handle/signal pair for a job with the given budget.
pub fn cancellation(budget: Duration) -> (CancelHandle, Cancellation) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, Cancellation { rx, budget })
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl Cancellation {
    /// A signal that is never raised.
    pub fn never() -> Self {
        let (_handle, cancel) = cancellation(Duration::MAX);
        cancel
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the signal is raised; pends forever if the handle is
    /// dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    pub fn timeout_error(&self) -> ImportError {
        ImportError::Timeout {
            budget_ms: u64::try_from(self.budget.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Drive `fut` unless the signal fires first, in which case `fut` is
    /// dropped in place.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(self.timeout_error()),
            res = fut => res,
        }
    }

    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        self.run(async {
            tokio::time::sleep(duration).await;
            Ok(())
        })
        .await
    }
}
