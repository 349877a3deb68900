use tracing::{debug, trace};

use super::{
    event::SimEvent,
    observer::Observer,
    process::{ProcessKey, ProcessState, Ticks},
    resources::{CpuId, ResourcePool},
    state::SimCtx,
};
use crate::scheduler::{Policy, SchedulingPolicy, TickOutcome};

/// Drives one tick at a time: submit, allocate, execute, advance.
pub struct SchedCore {
    pub ctx: SimCtx,
    pub policy: Policy,
    observer: Observer,
    events: Vec<SimEvent>,
}

impl SchedCore {
    pub fn new(policy: Policy, pool: ResourcePool) -> Self {
        let ctx = SimCtx::new(pool, policy.ready_queue());
        Self {
            ctx,
            policy,
            observer: Observer::new(),
            events: Vec::new(),
        }
    }

    /// Run a full tick for the processes arriving now and return the events
    /// it produced.
    pub fn tick(&mut self, mut arrivals: Vec<ProcessKey>) -> Vec<SimEvent> {
        trace!(now = self.ctx.now, arrivals = arrivals.len(), "tick");

        self.submit(&mut arrivals);
        self.allocate();
        self.execute();

        self.ctx.advance_time(1);
        self.observer.observe(&self.ctx);
        std::mem::take(&mut self.events)
    }

    fn submit(&mut self, arrivals: &mut [ProcessKey]) {
        self.policy.order_arrivals(&self.ctx, arrivals);
        for &key in arrivals.iter() {
            let from = self.ctx.mark_ready(key);
            self.state_change(key, from, ProcessState::Ready);
        }
    }

    // Candidates that cannot be admitted stay queued for the next tick
    fn allocate(&mut self) {
        for key in self.policy.order_ready_queue(&self.ctx) {
            let Some(cpu) = self.ctx.pool.pick_idle_cpu() else {
                break;
            };

            if !self.ctx.try_reserve(key) {
                let process = self.ctx.process(key);
                debug!(
                    process = %process.id,
                    requested = process.memory,
                    available = self.ctx.pool.free_memory(),
                    "admission deferred"
                );
                self.events.push(SimEvent::AdmissionDeferred {
                    process: key,
                    requested: process.memory,
                    available: self.ctx.pool.free_memory(),
                });
                continue;
            }

            let from = self.ctx.set_running(cpu, key);
            self.policy.on_admit(self.ctx.process_mut(key));

            debug!(
                now = self.ctx.now,
                process = %self.ctx.process(key).id,
                cpu = self.ctx.pool.cpu_name(cpu),
                "dispatched"
            );
            self.state_change(key, from, ProcessState::Running);
            self.events.push(SimEvent::CpuCurrentChange {
                cpu,
                from: None,
                to: Some(key),
            });
        }

        for cpu in 0..self.ctx.pool.cpus.len() {
            if self.ctx.pool.cpu_is_idle(cpu) {
                self.events.push(SimEvent::CpuIdle { cpu });
            }
        }
    }

    fn execute(&mut self) {
        let now = self.ctx.now;
        let running = self.ctx.running.clone();

        for key in running {
            // Increment service and let the policy account for the tick
            let (finished, outcome) = {
                let process = self.ctx.process_mut(key);
                if process.start_time.is_none() {
                    process.start_time = Some(now);
                }
                process.executed += 1;
                let outcome = self.policy.on_tick(process);
                (process.is_finished(), outcome)
            };

            if finished {
                let cpu = self.ctx.clear_cpu(key);
                let from = self.ctx.mark_terminated(key);
                debug!(now, process = %self.ctx.process(key).id, "terminated");
                self.cpu_released(cpu, key);
                self.state_change(key, from, ProcessState::Terminated);
            } else if outcome == TickOutcome::QuantumExpired {
                let cpu = self.ctx.clear_cpu(key);
                let from = self.ctx.mark_ready(key);
                debug!(now, process = %self.ctx.process(key).id, "quantum expired");
                self.cpu_released(cpu, key);
                self.state_change(key, from, ProcessState::Ready);
            }
        }
    }

    fn state_change(&mut self, process: ProcessKey, from: ProcessState, to: ProcessState) {
        self.events.push(SimEvent::StateChange { process, from, to });
    }

    fn cpu_released(&mut self, cpu: CpuId, process: ProcessKey) {
        self.events.push(SimEvent::CpuCurrentChange {
            cpu,
            from: Some(process),
            to: None,
        });
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
