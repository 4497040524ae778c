//! The `Pacer` trait — the engine's tick source.
//!
//! Every running workload's task calls [`Pacer::pace`] once per phase, so
//! swapping the pacer swaps the engine's notion of time.  Production uses
//! [`IntervalPacer`]; tests hand-crank phase advancement with
//! [`ManualPacer`].

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

/// A source of scheduling ticks.
///
/// `pace` resolves once per tick.  The engine only requires that ticks are
/// delivered in order and never skipped for a workload that keeps calling;
/// real-time accuracy is not part of the contract.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait out one scheduling tick.
    async fn pace(&self);
}

// ---------------------------------------------------------------------------
// IntervalPacer
// ---------------------------------------------------------------------------

/// Fixed-interval pacer: one tick per elapsed `tick` duration.
#[derive(Debug, Clone)]
pub struct IntervalPacer {
    tick: Duration,
}

impl IntervalPacer {
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn pace(&self) {
        tokio::time::sleep(self.tick).await;
    }
}

// ---------------------------------------------------------------------------
// ManualPacer
// ---------------------------------------------------------------------------

/// A hand-cranked pacer for tests.
///
/// `pace` blocks until a tick has been released via [`ManualPacer::release`].
/// Waiters are served in FIFO order, so with a single running workload the
/// caller controls phase advancement exactly.
pub struct ManualPacer {
    ticks: Semaphore,
}

impl ManualPacer {
    pub fn new() -> Self {
        Self {
            ticks: Semaphore::new(0),
        }
    }

    /// Make `count` ticks available to waiting workload tasks.
    pub fn release(&self, count: usize) {
        self.ticks.add_permits(count);
    }
}

impl Default for ManualPacer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pacer for ManualPacer {
    async fn pace(&self) {
        self.ticks
            .acquire()
            .await
            .expect("pacer semaphore closed")
            .forget();
    }
}
