//! Driver-side validation error.

use thiserror::Error;

/// Why a raw workload description cannot be submitted.
///
/// Produced by [`WorkloadSpec::validate`](crate::WorkloadSpec::validate)
/// before anything reaches the engine; the driver surfaces it to the
/// operator as a re-prompt.  Submission itself never fails — the engine
/// either admits or queues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// Requirement must be positive and no larger than the pool.
    #[error("memory requirement {requested} MB must be > 0 and <= pool capacity {capacity} MB")]
    MemoryOutOfRange { requested: u64, capacity: u64 },

    /// A workload must run at least one phase.
    #[error("total phases must be at least 1")]
    ZeroPhases,
}
