//! `workload` crate — the workload descriptor and its progress state.
//!
//! A workload is a simulated unit of work: a fixed memory cost plus a fixed
//! number of sequential execution phases.  This crate is pure data — all
//! timing and memory accounting belongs to the `engine` crate, which owns
//! every workload after submission.

pub mod error;
pub mod model;

pub use error::SpecError;
pub use model::{Workload, WorkloadId, WorkloadSpec};
