//! Global atomic counters for planning runs.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. before the process exits).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    plans_started: AtomicU64,
    plans_completed: AtomicU64,
    plans_failed: AtomicU64,
    malformed_responses: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            plans_started: AtomicU64::new(0),
            plans_completed: AtomicU64::new(0),
            plans_failed: AtomicU64::new(0),
            malformed_responses: AtomicU64::new(0),
        }
    }

    pub fn inc_plans_started(&self) {
        self.plans_started.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "plans_started", "counter incremented");
    }

    pub fn inc_plans_completed(&self) {
        self.plans_completed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "plans_completed", "counter incremented");
    }

    pub fn inc_plans_failed(&self) {
        self.plans_failed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "plans_failed", "counter incremented");
    }

    /// Agent answered with an empty or undeserializable work order.
    pub fn inc_malformed_responses(&self) {
        self.malformed_responses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "malformed_responses", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            plans_started = self.plans_started(),
            plans_completed = self.plans_completed(),
            plans_failed = self.plans_failed(),
            malformed_responses = self.malformed_responses(),
        );
    }

    pub fn plans_started(&self) -> u64 {
        self.plans_started.load(Ordering::Relaxed)
    }

    pub fn plans_completed(&self) -> u64 {
        self.plans_completed.load(Ordering::Relaxed)
    }

    pub fn plans_failed(&self) -> u64 {
        self.plans_failed.load(Ordering::Relaxed)
    }

    pub fn malformed_responses(&self) -> u64 {
        self.malformed_responses.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.plans_started.store(0, Ordering::Relaxed);
        self.plans_completed.store(0, Ordering::Relaxed);
        self.plans_failed.store(0, Ordering::Relaxed);
        self.malformed_responses.store(0, Ordering::Relaxed);
    }
}
