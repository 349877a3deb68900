use super::{process::ProcessState, state::SimCtx};

/// Re-checks the cross-structure invariants after every tick and keeps a few
/// running statistics about resource usage.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Observer {
    pub ticks: u64,
    pub busy_cpu_ticks: u64,
    pub peak_running: usize,
    pub peak_memory_reserved: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.ticks += 1;

        let busy = ctx.pool.busy_cpus();
        self.busy_cpu_ticks += busy as u64;
        self.peak_running = self.peak_running.max(ctx.running.len());
        self.peak_memory_reserved = self.peak_memory_reserved.max(ctx.pool.reserved_memory());

        debug_assert!(ctx.running.len() <= ctx.pool.cpus.len());
        debug_assert_eq!(busy, ctx.running.len(), "Running set and CPU table disagree");
        debug_assert!(ctx.pool.reserved_memory() <= ctx.pool.total_memory());
        debug_assert_eq!(
            ctx.pool.reserved_memory(),
            ctx.reserved_by_live_processes(),
            "Memory ledger drifted from live reservations"
        );
        debug_assert_eq!(
            ctx.ledger.open_count(),
            ctx.running.len(),
            "Every running process must own exactly one open span"
        );

        for cpu in &ctx.pool.cpus {
            if let Some(key) = cpu.current {
                let process = ctx.process(key);
                debug_assert_eq!(
                    process.state,
                    ProcessState::Running,
                    "cpu.current process {} must be Running",
                    process.id
                );
                debug_assert_eq!(
                    process.current_cpu,
                    Some(cpu.id),
                    "Process {} metadata current_cpu mismatch",
                    process.id
                );
                debug_assert!(
                    process.holds_reservation(),
                    "Running process {} holds no memory",
                    process.id
                );
            }
        }

        if cfg!(debug_assertions) {
            for key in ctx.ready.ordered() {
                let process = ctx.process(key);
                debug_assert_eq!(
                    process.state,
                    ProcessState::Ready,
                    "Queued process {} must be Ready",
                    process.id
                );
            }

            for process in ctx.processes.values() {
                debug_assert!(
                    process.executed <= process.run_length,
                    "Process {} over-executed",
                    process.id
                );
            }
        }
    }

    /// Fraction of processor-ticks spent running a process.
    pub fn utilization(&self, cpus: usize) -> f64 {
        if self.ticks == 0 || cpus == 0 {
            return 0.0;
        }
        self.busy_cpu_ticks as f64 / (self.ticks * cpus as u64) as f64
    }
}
