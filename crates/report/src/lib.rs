//! `report` crate — textual rendering of scheduler state.
//!
//! Everything here is a pure function from engine snapshots/events to
//! strings; nothing in this crate reads the clock or touches scheduler
//! state.  The CLI decides where the text goes.

use engine::{EngineEvent, Snapshot};

/// Width of the progress bar, in characters.
const BAR_WIDTH: usize = 20;

/// Render a fixed-width progress bar, e.g. `██████--------------`.
///
/// `current` is clamped to `total`, and a zero `total` renders as full —
/// nothing to do is all done.
pub fn progress_bar(current: u32, total: u32, width: usize) -> String {
    let filled = if total == 0 {
        width
    } else {
        (current.min(total) as usize * width) / total as usize
    };
    let mut bar = String::with_capacity(width);
    for _ in 0..filled {
        bar.push('█');
    }
    for _ in filled..width {
        bar.push('-');
    }
    bar
}

/// One progress line: name, percentage, bar, and phase counter.
pub fn format_progress(name: &str, current: u32, total: u32) -> String {
    let percent = if total == 0 {
        100
    } else {
        (u64::from(current.min(total)) * 100) / u64::from(total)
    };
    format!(
        "[{name}] ({percent}%) |{}| phase {current}/{total}",
        progress_bar(current, total, BAR_WIDTH)
    )
}

/// Multi-line memory status block for operator display.
pub fn format_snapshot(snapshot: &Snapshot) -> String {
    let running = if snapshot.running.is_empty() {
        "none".to_owned()
    } else {
        snapshot
            .running
            .iter()
            .map(|r| format!("{} ({}/{})", r.name, r.current_phase, r.total_phases))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let waiting = if snapshot.waiting.is_empty() {
        "none".to_owned()
    } else {
        snapshot
            .waiting
            .iter()
            .map(|w| format!("{} ({} MB)", w.name, w.memory_required))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Memory status:\n\
         \x20 total:   {} MB\n\
         \x20 used:    {} MB\n\
         \x20 free:    {} MB\n\
         \x20 running: {running}\n\
         \x20 waiting: {waiting}",
        snapshot.total_memory, snapshot.used_memory, snapshot.free_memory
    )
}

/// One human-readable line per engine event, for streaming to the console.
pub fn format_event(event: &EngineEvent) -> String {
    match event {
        EngineEvent::Admitted { id, name, memory_required } => {
            format!("[start] {name} (id {id}) running, {memory_required} MB reserved")
        }
        EngineEvent::Queued { id, name, memory_required } => {
            format!("[queue] {name} (id {id}) waiting for {memory_required} MB")
        }
        EngineEvent::Progressed { name, current_phase, total_phases, .. } => {
            format_progress(name, *current_phase, *total_phases)
        }
        EngineEvent::Completed { id, name, elapsed, .. } => {
            format!("[done]  {name} (id {id}) finished in {:.2}s", elapsed.as_secs_f64())
        }
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bar_at_phase_zero() {
        assert_eq!(progress_bar(0, 10, 20), "-".repeat(20));
    }

    #[test]
    fn full_bar_at_final_phase() {
        assert_eq!(progress_bar(10, 10, 20), "█".repeat(20));
    }

    #[test]
    fn bar_fills_proportionally() {
        // 3/10 of 20 characters rounds down to 6 filled.
        let bar = progress_bar(3, 10, 20);
        assert_eq!(bar, format!("{}{}", "█".repeat(6), "-".repeat(14)));
    }

    #[test]
    fn bar_clamps_overshoot() {
        assert_eq!(progress_bar(12, 10, 20), "█".repeat(20));
    }

    #[test]
    fn progress_line_shows_percent_and_phase() {
        let line = format_progress("encode", 3, 10);
        assert!(line.starts_with("[encode] (30%)"));
        assert!(line.ends_with("phase 3/10"));
    }

    #[test]
    fn snapshot_block_lists_running_and_waiting() {
        use engine::{RunningEntry, WaitingEntry};
        use workload::WorkloadId;

        let snapshot = Snapshot {
            total_memory: 100,
            used_memory: 60,
            free_memory: 40,
            running: vec![RunningEntry {
                id: WorkloadId::new(1),
                name: "alpha".into(),
                current_phase: 2,
                total_phases: 5,
            }],
            waiting: vec![WaitingEntry {
                id: WorkloadId::new(2),
                name: "beta".into(),
                memory_required: 70,
            }],
            captured_at: chrono::Utc::now(),
        };

        let block = format_snapshot(&snapshot);
        assert!(block.contains("total:   100 MB"));
        assert!(block.contains("running: alpha (2/5)"));
        assert!(block.contains("waiting: beta (70 MB)"));
    }

    #[test]
    fn snapshot_block_uses_placeholders_when_empty() {
        let snapshot = Snapshot {
            total_memory: 100,
            used_memory: 0,
            free_memory: 100,
            running: vec![],
            waiting: vec![],
            captured_at: chrono::Utc::now(),
        };

        let block = format_snapshot(&snapshot);
        assert!(block.contains("running: none"));
        assert!(block.contains("waiting: none"));
    }
}
