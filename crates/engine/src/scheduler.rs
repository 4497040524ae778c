//! The admission-and-progression engine.
//!
//! `MemoryScheduler` is the central orchestrator:
//! 1. `submit` classifies each workload as admit (reserve memory, start its
//!    phase timeline) or wait (append to the FIFO queue).
//! 2. Each running workload advances one phase per tick on its own task.
//! 3. A completed workload releases its memory and triggers `reclaim`, a
//!    single FIFO pass over the queue that admits everything that now fits.
//!
//! Every mutation — admission, phase advance, completion, reclaim — happens
//! inside one critical section over the engine state, so a completion's
//! release-and-reclaim is atomic with respect to every other workload's
//! next tick.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, Notify};
use tokio::time::Instant;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use workload::{Workload, WorkloadId, WorkloadSpec};

use crate::events::EngineEvent;
use crate::pacer::{IntervalPacer, Pacer};
use crate::snapshot::{RunningEntry, Snapshot, WaitingEntry};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Size of the flat memory pool, in MB.
    pub pool_capacity: u64,
    /// Logical tick length — how long one execution phase takes.
    pub tick: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 1024,
            tick: Duration::from_secs(1),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine state
// ---------------------------------------------------------------------------

/// A running workload plus the admission timestamp used for elapsed-time
/// reporting.  `admitted_at` is set exactly once, at admission.
struct RunningWorkload {
    workload: Workload,
    admitted_at: Instant,
}

/// The shared mutable state: the memory balance and both collections.
struct EngineState {
    used_memory: u64,
    running: HashMap<WorkloadId, RunningWorkload>,
    waiting: VecDeque<Workload>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            used_memory: 0,
            running: HashMap::new(),
            waiting: VecDeque::new(),
        }
    }

    /// `used_memory` must always equal the sum of requirements over the
    /// running set.  A mismatch is a programming defect, not a runtime
    /// condition to recover from.
    fn accounting_is_consistent(&self) -> bool {
        self.used_memory
            == self
                .running
                .values()
                .map(|r| r.workload.memory_required())
                .sum::<u64>()
    }

    fn is_idle(&self) -> bool {
        self.running.is_empty() && self.waiting.is_empty()
    }
}

// ---------------------------------------------------------------------------
// MemoryScheduler
// ---------------------------------------------------------------------------

/// The admission-and-progression engine.
///
/// Cheap to clone; clones share the same pool, collections, and event
/// stream.  Workloads are owned by the scheduler once submitted — the
/// driver observes them afterwards only through [`MemoryScheduler::snapshot`]
/// and the event stream.
#[derive(Clone)]
pub struct MemoryScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    config: SchedulerConfig,
    run_id: Uuid,
    pacer: Arc<dyn Pacer>,
    state: Mutex<EngineState>,
    events: broadcast::Sender<EngineEvent>,
    idle: Notify,
}

impl MemoryScheduler {
    /// Create a scheduler that paces phases on the configured tick interval.
    pub fn new(config: SchedulerConfig) -> Self {
        let pacer = Arc::new(IntervalPacer::new(config.tick));
        Self::with_pacer(config, pacer)
    }

    /// Create a scheduler driven by an explicit tick source.
    pub fn with_pacer(config: SchedulerConfig, pacer: Arc<dyn Pacer>) -> Self {
        let (events, _) = broadcast::channel(256);
        let run_id = Uuid::new_v4();
        info!(%run_id, pool_capacity = config.pool_capacity, "scheduler created");
        Self {
            inner: Arc::new(Inner {
                config,
                run_id,
                pacer,
                state: Mutex::new(EngineState::new()),
                events,
                idle: Notify::new(),
            }),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.inner.run_id
    }

    pub fn pool_capacity(&self) -> u64 {
        self.inner.config.pool_capacity
    }

    /// Submit a workload: admit it if it fits into free memory right now,
    /// otherwise append it to the waiting queue.
    ///
    /// Neither outcome is an error — the driver observes which one happened
    /// via the event stream or a snapshot.  The descriptor is expected to
    /// have passed [`WorkloadSpec::validate`] already; the engine only
    /// checks the requirement against the current balance.
    ///
    /// Must be called from within a tokio runtime (admission spawns the
    /// workload's progression task).
    #[instrument(skip(self, spec), fields(run_id = %self.inner.run_id, workload = %spec.id))]
    pub fn submit(&self, spec: WorkloadSpec) {
        let mut state = self.inner.lock_state();
        let workload = Workload::new(spec);

        if state.used_memory + workload.memory_required() <= self.inner.config.pool_capacity {
            self.admit(&mut state, workload);
        } else {
            info!(
                name = %workload.name(),
                required = workload.memory_required(),
                free = self.inner.config.pool_capacity - state.used_memory,
                "memory exhausted, queueing"
            );
            self.inner.emit(EngineEvent::Queued {
                id: workload.id(),
                name: workload.name().to_owned(),
                memory_required: workload.memory_required(),
            });
            state.waiting.push_back(workload);
        }
    }

    /// Point-in-time view of the pool and both collections.  Read-only:
    /// calling this any number of times changes nothing.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.inner.lock_state();

        let mut running: Vec<RunningEntry> = state
            .running
            .values()
            .map(|r| RunningEntry {
                id: r.workload.id(),
                name: r.workload.name().to_owned(),
                current_phase: r.workload.current_phase(),
                total_phases: r.workload.total_phases(),
            })
            .collect();
        running.sort_by_key(|entry| entry.id);

        let waiting = state
            .waiting
            .iter()
            .map(|w| WaitingEntry {
                id: w.id(),
                name: w.name().to_owned(),
                memory_required: w.memory_required(),
            })
            .collect();

        Snapshot {
            total_memory: self.inner.config.pool_capacity,
            used_memory: state.used_memory,
            free_memory: self.inner.config.pool_capacity - state.used_memory,
            running,
            waiting,
            captured_at: Utc::now(),
        }
    }

    /// Subscribe to the fire-and-forget event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.inner.events.subscribe()
    }

    /// True when nothing is running and nothing is waiting.
    pub fn is_idle(&self) -> bool {
        self.inner.lock_state().is_idle()
    }

    /// Resolve once every submitted workload has completed.
    ///
    /// A workload that never fits keeps the engine non-idle forever; that
    /// is the queue's documented behaviour, not a hang.
    pub async fn await_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().expect("engine state poisoned")
    }

    fn emit(&self, event: EngineEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }
}

// ---------------------------------------------------------------------------
// Internal: admission, progression, completion, reclaim
// ---------------------------------------------------------------------------

impl MemoryScheduler {
    /// Admit a workload: reserve memory, record the admission timestamp,
    /// move it into the running set, and start its phase timeline.
    ///
    /// Callers must have verified the fit under the same lock.
    fn admit(&self, state: &mut EngineState, workload: Workload) {
        debug_assert!(
            state.used_memory + workload.memory_required() <= self.inner.config.pool_capacity,
            "admission would overcommit the pool"
        );

        let id = workload.id();
        info!(
            workload = %id,
            name = %workload.name(),
            reserved = workload.memory_required(),
            "admitted"
        );

        state.used_memory += workload.memory_required();
        self.inner.emit(EngineEvent::Admitted {
            id,
            name: workload.name().to_owned(),
            memory_required: workload.memory_required(),
        });
        state.running.insert(
            id,
            RunningWorkload {
                workload,
                admitted_at: Instant::now(),
            },
        );
        debug_assert!(state.accounting_is_consistent());

        self.spawn_progression(id);
    }

    /// One task per running workload: wait a tick, advance a phase, repeat
    /// until complete.
    fn spawn_progression(&self, id: WorkloadId) {
        let scheduler = self.clone();
        tokio::spawn(async move {
            loop {
                scheduler.inner.pacer.pace().await;
                if scheduler.step(id) {
                    break;
                }
            }
        });
    }

    /// Advance `id` by one phase.  Returns `true` once the workload is done
    /// (or gone) and its timeline should stop.
    fn step(&self, id: WorkloadId) -> bool {
        let mut state = self.inner.lock_state();

        let Some(entry) = state.running.get_mut(&id) else {
            // Progression raced a removal; nothing left to drive.
            return true;
        };

        let current_phase = entry.workload.advance();
        let total_phases = entry.workload.total_phases();
        debug!(workload = %id, current_phase, total_phases, "phase finished");
        self.inner.emit(EngineEvent::Progressed {
            id,
            name: entry.workload.name().to_owned(),
            current_phase,
            total_phases,
        });

        if entry.workload.is_complete() {
            self.complete(&mut state, id);
            true
        } else {
            false
        }
    }

    /// Remove a finished workload, release its memory, and re-scan the
    /// queue.  Runs under the state lock, so the whole
    /// release-then-reclaim sequence is one atomic step.
    fn complete(&self, state: &mut EngineState, id: WorkloadId) {
        let Some(entry) = state.running.remove(&id) else {
            return;
        };
        let elapsed = entry.admitted_at.elapsed();
        let released = entry.workload.memory_required();

        state.used_memory -= released;
        debug_assert!(state.accounting_is_consistent());

        info!(
            workload = %id,
            name = %entry.workload.name(),
            released,
            elapsed_ms = elapsed.as_millis() as u64,
            "completed"
        );
        self.inner.emit(EngineEvent::Completed {
            id,
            name: entry.workload.name().to_owned(),
            memory_released: released,
            elapsed,
        });

        self.reclaim(state);

        if state.is_idle() {
            self.inner.idle.notify_waiters();
        }
    }

    /// Re-scan the waiting queue after memory was freed.
    ///
    /// Non-blocking FIFO: candidates are taken in submission order, and one
    /// that does not fit is skipped rather than blocking smaller entries
    /// behind it.  Each admission deducts memory before the next candidate
    /// is examined, so a single release can cascade into several
    /// admissions in one pass.  Workloads admitted here never re-enter the
    /// queue, which bounds the pass to one scan.
    fn reclaim(&self, state: &mut EngineState) {
        let pending = std::mem::take(&mut state.waiting);
        let mut admitted = 0usize;

        for workload in pending {
            if state.used_memory + workload.memory_required() <= self.inner.config.pool_capacity {
                self.admit(state, workload);
                admitted += 1;
            } else {
                state.waiting.push_back(workload);
            }
        }

        if admitted > 0 {
            debug!(
                admitted,
                still_waiting = state.waiting.len(),
                "reclaim admitted queued workloads"
            );
        }
    }
}
