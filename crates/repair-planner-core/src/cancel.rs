//! Cooperative cancellation for planning requests.

use std::future::Future;

use tokio::sync::watch;

use crate::error::{PlanningError, PlanningResult};

/// Create a connected handle/signal pair.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx: Some(rx) })
}

/// Requests cancellation of every request holding the paired signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observed by the planner at each suspension point.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once cancellation is requested. A dropped handle never cancels.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.rx else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        let closed = rx.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }

    /// Run `fut` unless cancellation arrives first. An already-cancelled
    /// signal never polls `fut`.
    pub async fn guard<F: Future>(&self, fut: F) -> PlanningResult<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(PlanningError::Cancelled),
            out = fut => Ok(out),
        }
    }
}
