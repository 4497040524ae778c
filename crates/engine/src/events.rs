//! Fire-and-forget engine events.
//!
//! Observers subscribe via [`MemoryScheduler::subscribe`](crate::MemoryScheduler::subscribe);
//! the engine never waits on a receiver, and no engine state depends on
//! anyone listening.

use std::time::Duration;

use workload::WorkloadId;

/// A notification emitted by the scheduler.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// The workload fit into free memory and started running.
    Admitted {
        id: WorkloadId,
        name: String,
        memory_required: u64,
    },

    /// Free memory was insufficient; the workload joined the waiting queue.
    /// Queueing is normal flow, not a failure.
    Queued {
        id: WorkloadId,
        name: String,
        memory_required: u64,
    },

    /// A running workload finished one phase.
    Progressed {
        id: WorkloadId,
        name: String,
        current_phase: u32,
        total_phases: u32,
    },

    /// The workload ran every phase; its memory has been released.
    Completed {
        id: WorkloadId,
        name: String,
        memory_released: u64,
        /// Monotonic time spent between admission and completion.
        elapsed: Duration,
    },
}
