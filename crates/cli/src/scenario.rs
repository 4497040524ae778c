//! Scenario files — batch input for non-interactive runs.
//!
//! A scenario is a JSON document:
//!
//! ```json
//! {
//!   "capacity": 100,
//!   "tick_ms": 250,
//!   "workloads": [
//!     { "name": "ingest", "memory": 80, "phases": 4 },
//!     { "memory": 30, "phases": 2 }
//!   ]
//! }
//! ```
//!
//! Ids are assigned in file order; a missing `name` is synthesized from the
//! id.  Every entry is validated here, before anything reaches the engine.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use workload::{WorkloadId, WorkloadSpec};

#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Memory pool size in MB.
    #[serde(default = "default_capacity")]
    pub capacity: u64,
    /// Length of one execution phase, in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    pub workloads: Vec<ScenarioWorkload>,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioWorkload {
    #[serde(default)]
    pub name: Option<String>,
    /// Memory requirement in MB.
    pub memory: u64,
    pub phases: u32,
}

fn default_capacity() -> u64 {
    1024
}

fn default_tick_ms() -> u64 {
    1000
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read scenario file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid scenario JSON in {}", path.display()))
    }

    /// Turn entries into validated specs, assigning ids in file order.
    pub fn specs(&self) -> anyhow::Result<Vec<WorkloadSpec>> {
        let mut specs = Vec::with_capacity(self.workloads.len());
        for (index, entry) in self.workloads.iter().enumerate() {
            let id = WorkloadId::new(index as u64 + 1);
            let name = entry
                .name
                .clone()
                .unwrap_or_else(|| format!("workload-{id}"));
            let spec = WorkloadSpec::new(id, name, entry.memory, entry.phases);
            spec.validate(self.capacity)
                .with_context(|| format!("workload #{} is invalid", index + 1))?;
            specs.push(spec);
        }
        Ok(specs)
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_scenario() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "capacity": 100,
                "tick_ms": 250,
                "workloads": [
                    { "name": "ingest", "memory": 80, "phases": 4 },
                    { "memory": 30, "phases": 2 }
                ]
            }"#,
        )
        .expect("scenario should parse");

        assert_eq!(scenario.capacity, 100);
        assert_eq!(scenario.tick_ms, 250);
        assert_eq!(scenario.workloads.len(), 2);
    }

    #[test]
    fn capacity_and_tick_default_when_absent() {
        let scenario: Scenario = serde_json::from_str(
            r#"{ "workloads": [ { "memory": 10, "phases": 1 } ] }"#,
        )
        .expect("scenario should parse");

        assert_eq!(scenario.capacity, 1024);
        assert_eq!(scenario.tick_ms, 1000);
    }

    #[test]
    fn specs_assign_ids_and_synthesize_missing_names() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "capacity": 100,
                "workloads": [
                    { "name": "ingest", "memory": 80, "phases": 4 },
                    { "memory": 30, "phases": 2 }
                ]
            }"#,
        )
        .unwrap();

        let specs = scenario.specs().expect("both entries are valid");
        assert_eq!(specs[0].id, WorkloadId::new(1));
        assert_eq!(specs[0].name, "ingest");
        assert_eq!(specs[1].id, WorkloadId::new(2));
        assert_eq!(specs[1].name, "workload-2");
    }

    #[test]
    fn oversized_entry_is_rejected_with_its_position() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "capacity": 100,
                "workloads": [ { "memory": 200, "phases": 1 } ]
            }"#,
        )
        .unwrap();

        let err = scenario.specs().expect_err("200 MB cannot fit a 100 MB pool");
        assert!(err.to_string().contains("workload #1"));
    }
}
