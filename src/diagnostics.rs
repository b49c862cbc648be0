//! Informational events emitted while a race runs.

use core::time::Duration;

use crate::Outcome;

/// Receives diagnostic events from the spawner and the operations.
///
/// Every method defaults to doing nothing. None of these events take part in
/// deciding a race.
pub trait Diagnostics: Send + Sync {
    /// A batch of `count` operations was spawned.
    fn spawned(&self, _count: usize) {}

    /// Operation `id` waited out `elapsed` and settled on `outcome`.
    fn completed(&self, _id: usize, _outcome: Outcome, _elapsed: Duration) {}

    /// Operation `id` was stopped before it settled.
    fn cancelled(&self, _id: usize) {}

    /// The race resolved to `success`.
    fn resolved(&self, _success: bool) {}
}

/// Discards every event.
impl Diagnostics for () {}

/// Forwards every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracing;

impl Diagnostics for Tracing {
    fn spawned(&self, count: usize) {
        tracing::info!(count, "there will be {count} request(s)");
    }

    fn completed(&self, id: usize, outcome: Outcome, elapsed: Duration) {
        tracing::info!(
            id,
            %outcome,
            elapsed_ms = elapsed.as_millis() as u64,
            "request {id} completed"
        );
    }

    fn cancelled(&self, id: usize) {
        tracing::info!(id, "request {id} is cancelled");
    }

    fn resolved(&self, success: bool) {
        tracing::debug!(success, "race resolved");
    }
}
