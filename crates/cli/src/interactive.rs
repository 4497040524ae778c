//! Interactive operator menu.
//!
//! The menu owns the driver-side context: the id counter, the list of
//! pending (not yet submitted) workloads, and all input validation.  Bad
//! input is answered with a message and a fresh prompt — it never reaches
//! the engine.

use std::io::Write as _;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use engine::{MemoryScheduler, SchedulerConfig};
use workload::{WorkloadId, WorkloadSpec};

type InputLines = Lines<BufReader<Stdin>>;

pub async fn run(capacity: u64, tick_ms: u64) -> anyhow::Result<()> {
    let scheduler = MemoryScheduler::new(SchedulerConfig {
        pool_capacity: capacity,
        tick: Duration::from_millis(tick_ms),
    });
    let mut rx = scheduler.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Driver context: ids are assigned here and never reused.
    let mut next_id: u64 = 1;
    let mut pending: Vec<WorkloadSpec> = Vec::new();

    println!("=== memsim — {capacity} MB pool ===");
    loop {
        println!();
        println!("1. add workload");
        println!("2. run pending workloads");
        println!("3. show memory status");
        println!("4. quit");

        let Some(choice) = prompt(&mut lines, "select an option: ").await? else {
            break;
        };
        match choice.trim() {
            "1" => add_workload(&mut lines, capacity, &mut next_id, &mut pending).await?,
            "2" => run_pending(&scheduler, &mut rx, &mut pending).await,
            "3" => println!("{}", report::format_snapshot(&scheduler.snapshot())),
            "4" => break,
            other => println!("invalid option: {other}"),
        }
    }

    println!("bye.");
    Ok(())
}

/// Prompt for, validate, and stage one workload.
async fn add_workload(
    lines: &mut InputLines,
    capacity: u64,
    next_id: &mut u64,
    pending: &mut Vec<WorkloadSpec>,
) -> anyhow::Result<()> {
    let Some(name) = prompt(lines, "name (blank to auto-generate): ").await? else {
        return Ok(());
    };
    let Some(memory) = prompt(lines, "memory required (MB): ").await? else {
        return Ok(());
    };
    let Some(phases) = prompt(lines, "number of phases: ").await? else {
        return Ok(());
    };

    let (Ok(memory), Ok(phases)) = (memory.trim().parse::<u64>(), phases.trim().parse::<u32>())
    else {
        println!("memory and phases must be whole numbers, try again.");
        return Ok(());
    };

    let id = WorkloadId::new(*next_id);
    let name = match name.trim() {
        "" => format!("workload-{id}"),
        trimmed => trimmed.to_owned(),
    };

    let spec = WorkloadSpec::new(id, name, memory, phases);
    if let Err(err) = spec.validate(capacity) {
        println!("{err}, try again.");
        return Ok(());
    }

    *next_id += 1;
    println!("added {} (id {id})", spec.name);
    pending.push(spec);
    Ok(())
}

/// Submit everything staged and stream events until the engine drains.
async fn run_pending(
    scheduler: &MemoryScheduler,
    rx: &mut tokio::sync::broadcast::Receiver<engine::EngineEvent>,
    pending: &mut Vec<WorkloadSpec>,
) {
    if pending.is_empty() {
        println!("no pending workloads.");
        return;
    }

    println!("running {} workload(s)...", pending.len());
    for spec in pending.drain(..) {
        scheduler.submit(spec);
    }

    crate::stream_until_idle(scheduler, rx).await;
    println!("all workloads finished.");
}

async fn prompt(lines: &mut InputLines, message: &str) -> anyhow::Result<Option<String>> {
    print!("{message}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}
