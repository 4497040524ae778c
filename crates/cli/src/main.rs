//! `memsim` CLI entry-point.
//!
//! Available sub-commands:
//! - `interactive` — operator menu on stdin: add workloads, run them,
//!   inspect memory.
//! - `run`         — execute a scenario file to completion.
//!
//! This binary is the engine's external driver: it assigns workload ids,
//! synthesizes display names, validates raw operator input (re-prompting on
//! bad entries rather than bothering the engine), and renders the event
//! stream via the `report` crate.

mod interactive;
mod scenario;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::broadcast;
use tracing::info;

use engine::{EngineEvent, MemoryScheduler, SchedulerConfig};

use crate::scenario::Scenario;

#[derive(Parser)]
#[command(
    name = "memsim",
    about = "Memory-admission workload simulator",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive operator menu.
    Interactive {
        /// Memory pool size in MB.
        #[arg(long, default_value_t = 1024)]
        capacity: u64,
        /// Length of one execution phase, in milliseconds.
        #[arg(long, default_value_t = 1000)]
        tick_ms: u64,
    },
    /// Run a scenario file and print the final memory status.
    Run {
        /// Path to the scenario JSON file.
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Interactive { capacity, tick_ms } => {
            interactive::run(capacity, tick_ms).await
        }
        Command::Run { path } => run_scenario(&path).await,
    }
}

async fn run_scenario(path: &Path) -> anyhow::Result<()> {
    let scenario = Scenario::load(path)?;
    let specs = scenario.specs()?;
    info!(
        path = %path.display(),
        workloads = specs.len(),
        capacity = scenario.capacity,
        "scenario loaded"
    );

    let scheduler = MemoryScheduler::new(SchedulerConfig {
        pool_capacity: scenario.capacity,
        tick: Duration::from_millis(scenario.tick_ms),
    });
    let mut rx = scheduler.subscribe();

    println!(
        "running {} workload(s) against a {} MB pool",
        specs.len(),
        scenario.capacity
    );
    for spec in specs {
        scheduler.submit(spec);
    }

    stream_until_idle(&scheduler, &mut rx).await;
    println!("{}", report::format_snapshot(&scheduler.snapshot()));
    Ok(())
}

/// Print engine events until everything submitted has finished.
///
/// Every driver-validated workload has finite phases and fits the pool, so
/// the queue always drains and the engine always reaches idle.
pub(crate) async fn stream_until_idle(
    scheduler: &MemoryScheduler,
    rx: &mut broadcast::Receiver<EngineEvent>,
) {
    while !scheduler.is_idle() {
        match rx.recv().await {
            Ok(event) => println!("{}", report::format_event(&event)),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                println!("(display fell behind; {skipped} events skipped)");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    // The engine went idle between our last recv and the check; drain
    // whatever is still buffered.
    while let Ok(event) = rx.try_recv() {
        println!("{}", report::format_event(&event));
    }
}
