use average::{Estimate, Mean};
use serde::Serialize;

use crate::core::{ProcessRecord, Ticks};

/// One line of the per-run metrics file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub algorithm: String,
    pub average_wait: f64,
    pub average_response: f64,
    pub makespan: Ticks,
}

pub fn average_wait(records: &[ProcessRecord]) -> f64 {
    avg(records.iter().filter_map(|p| p.wait_time()))
}

pub fn average_response(records: &[ProcessRecord]) -> f64 {
    avg(records.iter().filter_map(|p| p.response_time()))
}

// Empty input averages to zero
fn avg(iter: impl Iterator<Item = Ticks>) -> f64 {
    let mean: Mean = iter.map(|t| t as f64).collect();
    if mean.is_empty() { 0.0 } else { mean.estimate() }
}
