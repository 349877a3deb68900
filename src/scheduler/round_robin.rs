use super::{SchedulingPolicy, TickOutcome};
use crate::core::{ProcessKey, ProcessRecord, ReadyQueue, SimCtx, Ticks};

/// Fixed-quantum rotation over a single line. Same-tick arrivals enter by
/// priority; evicted processes rejoin at the tail with their memory intact.
pub struct RoundRobinPolicy {
    quantum: Ticks,
}

impl RoundRobinPolicy {
    pub fn new(quantum: Ticks) -> Self {
        assert!(quantum > 0, "Round robin quantum must be positive");
        Self { quantum }
    }
}

impl SchedulingPolicy for RoundRobinPolicy {
    fn ready_queue(&self) -> ReadyQueue {
        ReadyQueue::new_line()
    }

    fn order_arrivals(&self, ctx: &SimCtx, arrivals: &mut [ProcessKey]) {
        // sort_by is stable: equal priorities keep submission order
        arrivals.sort_by(|&a, &b| ctx.process(b).priority.cmp(&ctx.process(a).priority));
    }

    fn on_admit(&self, process: &mut ProcessRecord) {
        process.remaining_quantum = Some(self.quantum);
    }

    fn on_tick(&self, process: &mut ProcessRecord) -> TickOutcome {
        let remaining = process
            .remaining_quantum
            .as_mut()
            .expect("Round robin process running without a quantum");
        *remaining = remaining.saturating_sub(1);

        if *remaining > 0 || process.is_finished() {
            return TickOutcome::Continue;
        }
        process.remaining_quantum = Some(self.quantum);
        TickOutcome::QuantumExpired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProcessState;

    fn running(run_length: Ticks) -> ProcessRecord {
        ProcessRecord {
            id: "P1".into(),
            arrival: 0,
            run_length,
            memory: 1,
            priority: 0,
            deadline: None,
            state: ProcessState::Running,
            executed: 0,
            remaining_quantum: None,
            start_time: Some(0),
            end_time: None,
            reserved_memory: Some(1),
            current_cpu: Some(0),
        }
    }

    #[test]
    fn quantum_expires_and_resets() {
        let rr = RoundRobinPolicy::new(2);
        let mut p = running(5);
        rr.on_admit(&mut p);

        p.executed += 1;
        assert_eq!(rr.on_tick(&mut p), TickOutcome::Continue);
        assert_eq!(p.remaining_quantum, Some(1));

        p.executed += 1;
        assert_eq!(rr.on_tick(&mut p), TickOutcome::QuantumExpired);
        assert_eq!(p.remaining_quantum, Some(2));
    }

    #[test]
    fn finishing_on_the_last_quantum_tick_is_not_an_expiry() {
        let rr = RoundRobinPolicy::new(2);
        let mut p = running(2);
        rr.on_admit(&mut p);

        p.executed = 2;
        p.remaining_quantum = Some(1);
        assert_eq!(rr.on_tick(&mut p), TickOutcome::Continue);
        assert_eq!(p.remaining_quantum, Some(0));
    }
}
