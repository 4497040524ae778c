//! `engine` crate — the memory-admission scheduling engine.
//!
//! [`MemoryScheduler`] owns a flat memory pool, the set of running
//! workloads, and a FIFO waiting queue.  Submissions are admitted
//! immediately when the pool has room and queued otherwise; every running
//! workload advances one phase per scheduling tick on its own task, and
//! each completion releases memory and re-scans the queue (admitting
//! everything that now fits, cascading as the balance changes).

pub mod events;
pub mod pacer;
pub mod scheduler;
pub mod snapshot;

pub use events::EngineEvent;
pub use pacer::{IntervalPacer, ManualPacer, Pacer};
pub use scheduler::{MemoryScheduler, SchedulerConfig};
pub use snapshot::{RunningEntry, Snapshot, WaitingEntry};
