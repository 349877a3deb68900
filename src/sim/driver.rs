use std::collections::VecDeque;

use tracing::info;

use super::{
    job::{ProcessSpec, ResourceSpec},
    result::SimulationResult,
};
use crate::core::{ProcessKey, ProcessRecord, ResourcePool, SchedCore, SimEvent, Ticks};
use crate::scheduler::Policy;

/// One independent simulation run over a fixed process set.
///
/// # Liveness
/// Every process must fit in total memory. A process whose requirement
/// exceeds the pool's capacity is never admitted and the run never finishes;
/// this is a precondition, checked by `validate` before a run is built.
pub struct Sim {
    pub core: SchedCore,
    // Sorted by arrival, then submission order
    pending: VecDeque<ProcessKey>,
}

impl Sim {
    pub fn new(policy: Policy, processes: Vec<ProcessSpec>, resources: &ResourceSpec) -> Self {
        let pool = ResourcePool::new(resources.processor_ids.iter().cloned(), resources.total_memory);
        let mut core = SchedCore::new(policy, pool);

        let mut processes = processes;
        // Stable: processes sharing an arrival tick keep their input order
        processes.sort_by_key(|p| p.arrival);
        let pending = processes
            .into_iter()
            .map(|p| {
                core.ctx
                    .create_process(p.id, p.arrival, p.run_length, p.memory, p.priority, p.deadline)
            })
            .collect();

        Self { core, pending }
    }

    pub fn step(&mut self) -> Vec<SimEvent> {
        let arrivals = self.handle_arrivals();
        self.core.tick(arrivals)
    }

    fn handle_arrivals(&mut self) -> Vec<ProcessKey> {
        let now = self.core.now();
        let mut arrivals = Vec::new();
        // Contiguous, since pending is sorted by arrival
        while let Some(&key) = self.pending.front() {
            if self.core.ctx.process(key).arrival > now {
                break;
            }
            self.pending.pop_front();
            arrivals.push(key);
        }
        arrivals
    }

    pub fn all_processes_terminated(&self) -> bool {
        self.pending.is_empty() && self.core.ctx.is_idle()
    }

    pub fn now(&self) -> Ticks {
        self.core.now()
    }

    pub fn process(&self, key: ProcessKey) -> &ProcessRecord {
        self.core.ctx.process(key)
    }

    pub fn processes(&self) -> impl Iterator<Item = (ProcessKey, &ProcessRecord)> {
        self.core.ctx.processes.iter()
    }

    pub fn run(mut self) -> SimulationResult {
        while !self.all_processes_terminated() {
            self.step();
        }
        self.finish()
    }

    /// Consume a completed run into its result.
    pub fn finish(self) -> SimulationResult {
        debug_assert!(self.all_processes_terminated(), "Simulation still has live processes");

        let makespan = self.core.now();
        let policy = self.core.policy;
        let utilization = self
            .core
            .observer()
            .utilization(self.core.ctx.pool.cpus.len());
        let ctx = self.core.ctx;
        let terminated = ctx
            .terminated
            .iter()
            .map(|&key| ctx.processes[key].clone())
            .collect();

        info!(
            %policy,
            makespan,
            utilization,
            "simulation finished"
        );

        SimulationResult {
            terminated,
            allocation_log: ctx.ledger.into_spans(),
            makespan,
        }
    }
}

/// Replay `processes` tick by tick under `policy` until all of them have
/// terminated.
pub fn run_simulation(
    policy: Policy,
    processes: Vec<ProcessSpec>,
    resources: &ResourceSpec,
) -> SimulationResult {
    Sim::new(policy, processes, resources).run()
}
