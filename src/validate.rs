// Input checks performed before a simulation is built. Anything that passes
// here satisfies the simulator's preconditions, including liveness: every
// process fits in total memory.

use rustc_hash::FxHashSet;

use crate::config::ResourceFile;
use crate::error::{Error, Result};
use crate::input::ProcessRow;
use crate::sim::{ProcessSpec, ResourceSpec};

pub fn validate_resources(file: &ResourceFile) -> Result<ResourceSpec> {
    let invalid = |reason: String| Err(Error::InvalidResources(reason));

    // A miscounted list is reported before an empty one
    if let Some(declared) = file.processor_count {
        if declared != file.processors.len() as i64 {
            return Err(Error::ProcessorCountMismatch {
                declared,
                listed: file.processors.len(),
            });
        }
    }
    if file.processors.is_empty() {
        return invalid("no processor declared".into());
    }
    let mut seen = FxHashSet::default();
    for processor in &file.processors {
        if !seen.insert(processor.id.as_str()) {
            return invalid(format!("duplicate processor id {}", processor.id));
        }
    }
    if file.total_memory <= 0 {
        return invalid(format!("totalMemory must be positive, got {}", file.total_memory));
    }

    Ok(ResourceSpec::new(
        file.processors.iter().map(|p| p.id.clone()),
        file.total_memory as u64,
    ))
}

pub fn validate_processes(rows: Vec<ProcessRow>, resources: &ResourceSpec) -> Result<Vec<ProcessSpec>> {
    let mut seen = FxHashSet::default();
    let mut specs = Vec::with_capacity(rows.len());

    for row in rows {
        let invalid = |reason: String| Error::InvalidProcess {
            id: row.id.clone(),
            reason,
        };

        if !seen.insert(row.id.clone()) {
            return Err(invalid("duplicate process id".into()));
        }
        let numeric = [
            ("arrival", Some(row.arrival)),
            ("runLength", Some(row.run_length)),
            ("memory", Some(row.memory)),
            ("deadline", row.deadline),
            ("priority", row.priority),
        ];
        for (field, value) in numeric {
            if let Some(v) = value.filter(|v| *v < 0) {
                return Err(invalid(format!("{field} is negative ({v})")));
            }
        }
        if row.run_length == 0 {
            return Err(invalid("runLength must be positive".into()));
        }
        if row.memory == 0 {
            return Err(invalid("memory must be positive".into()));
        }
        if row.memory as u64 > resources.total_memory {
            return Err(invalid(format!(
                "requires {} memory but only {} exists",
                row.memory, resources.total_memory
            )));
        }
        if let Some(deadline) = row.deadline.filter(|d| *d < row.arrival) {
            return Err(invalid(format!(
                "deadline {deadline} precedes arrival {}",
                row.arrival
            )));
        }

        specs.push(ProcessSpec {
            id: row.id.clone(),
            arrival: row.arrival as u64,
            run_length: row.run_length as u64,
            memory: row.memory as u64,
            priority: row.priority.unwrap_or(0),
            deadline: row.deadline.map(|d| d as u64),
        });
    }
    Ok(specs)
}
