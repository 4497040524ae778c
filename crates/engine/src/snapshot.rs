//! Read-only views of engine state.
//!
//! These are *reporting* types — they carry no behaviour and taking one
//! never mutates the scheduler.  Rendering them is the `report` crate's
//! job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use workload::WorkloadId;

/// Point-in-time view of the memory pool and both workload collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub total_memory: u64,
    pub used_memory: u64,
    pub free_memory: u64,
    /// Running workloads, ordered by id.
    pub running: Vec<RunningEntry>,
    /// Waiting workloads in queue (FIFO) order.
    pub waiting: Vec<WaitingEntry>,
    pub captured_at: DateTime<Utc>,
}

/// One currently-running workload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunningEntry {
    pub id: WorkloadId,
    pub name: String,
    pub current_phase: u32,
    pub total_phases: u32,
}

/// One queued workload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitingEntry {
    pub id: WorkloadId,
    pub name: String,
    pub memory_required: u64,
}
