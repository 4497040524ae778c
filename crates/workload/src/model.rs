//! Core domain types for the simulator.
//!
//! `WorkloadSpec` is the immutable descriptor an operator submits;
//! `Workload` wraps it with the mutable phase counter the engine drives.

use serde::{Deserialize, Serialize};

use crate::SpecError;

// ---------------------------------------------------------------------------
// WorkloadId
// ---------------------------------------------------------------------------

/// Unique identifier for a workload.
///
/// Assigned by the driver at creation time and never reused within a
/// simulation run.  The engine treats it as opaque.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WorkloadId(u64);

impl WorkloadId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for WorkloadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// WorkloadSpec
// ---------------------------------------------------------------------------

/// Immutable description of a workload: what it is and what it costs.
///
/// Fixed for the workload's lifetime once constructed.  Raw operator input
/// is validated by the driver (via [`WorkloadSpec::validate`]) before it
/// reaches the engine; the engine itself only checks the requirement
/// against currently free memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSpec {
    pub id: WorkloadId,
    /// Human-readable label.  Name synthesis for blank input is the
    /// driver's job, not this crate's.
    pub name: String,
    /// Memory reserved for the workload's whole lifetime, in MB.
    pub memory_required: u64,
    /// Number of sequential execution phases.
    pub total_phases: u32,
}

impl WorkloadSpec {
    pub fn new(
        id: WorkloadId,
        name: impl Into<String>,
        memory_required: u64,
        total_phases: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            memory_required,
            total_phases,
        }
    }

    /// Check this descriptor against the driver's admission contract.
    ///
    /// # Errors
    /// - [`SpecError::MemoryOutOfRange`] unless `0 < memory_required <= pool_capacity`.
    /// - [`SpecError::ZeroPhases`] if `total_phases` is zero.
    pub fn validate(&self, pool_capacity: u64) -> Result<(), SpecError> {
        if self.memory_required == 0 || self.memory_required > pool_capacity {
            return Err(SpecError::MemoryOutOfRange {
                requested: self.memory_required,
                capacity: pool_capacity,
            });
        }
        if self.total_phases == 0 {
            return Err(SpecError::ZeroPhases);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Workload
// ---------------------------------------------------------------------------

/// A submitted workload: the descriptor plus its phase progress.
///
/// `current_phase` starts at 0 and moves up by exactly one per scheduling
/// tick while the workload is running.  Completion is always derived from
/// the counter — there is no separate "done" flag to drift out of sync.
#[derive(Debug, Clone)]
pub struct Workload {
    spec: WorkloadSpec,
    current_phase: u32,
}

impl Workload {
    pub fn new(spec: WorkloadSpec) -> Self {
        Self {
            spec,
            current_phase: 0,
        }
    }

    pub fn spec(&self) -> &WorkloadSpec {
        &self.spec
    }

    pub fn id(&self) -> WorkloadId {
        self.spec.id
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn memory_required(&self) -> u64 {
        self.spec.memory_required
    }

    pub fn total_phases(&self) -> u32 {
        self.spec.total_phases
    }

    pub fn current_phase(&self) -> u32 {
        self.current_phase
    }

    /// Advance one phase and return the new phase number.
    ///
    /// Callers must not advance a completed workload; the phase counter
    /// never passes `total_phases`.
    pub fn advance(&mut self) -> u32 {
        debug_assert!(
            self.current_phase < self.spec.total_phases,
            "advance() on a completed workload"
        );
        self.current_phase += 1;
        self.current_phase
    }

    /// Completion predicate: every phase has run.
    pub fn is_complete(&self) -> bool {
        self.current_phase >= self.spec.total_phases
    }
}
