
use crate::core::{AllocationSpan, ProcessRecord, Ticks};
use crate::metrics::{self, RunSummary};
use crate::scheduler::Policy;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Final snapshots, in termination order.
    pub terminated: Vec<ProcessRecord>,
    /// Allocation spans, in opening order.
    pub allocation_log: Vec<AllocationSpan>,
    pub makespan: Ticks,
}

impl SimulationResult {
    pub fn average_wait(&self) -> f64 {
        metrics::average_wait(&self.terminated)
    }

    pub fn average_response(&self) -> f64 {
        metrics::average_response(&self.terminated)
    }

    pub fn summary(&self, policy: &Policy) -> RunSummary {
        RunSummary {
            algorithm: policy.name().to_owned(),
            average_wait: self.average_wait(),
            average_response: self.average_response(),
            makespan: self.makespan,
        }
    }

    pub fn record(&self, id: &str) -> Option<&ProcessRecord> {
        self.terminated.iter().find(|p| p.id == id)
    }

    pub fn spans_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a AllocationSpan> + 'a {
        self.allocation_log.iter().filter(move |s| s.process == id)
    }

    pub fn deadline_misses(&self) -> impl Iterator<Item = &ProcessRecord> {
        self.terminated.iter().filter(|p| p.missed_deadline())
    }
}
