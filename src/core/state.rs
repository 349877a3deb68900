use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use super::{
    ledger::AllocationLedger,
    process::{Memory, ProcessKey, ProcessRecord, ProcessState, Ticks},
    queue::ReadyQueue,
    resources::{CpuId, ResourcePool},
};

/// All mutable simulation state. Queues hold keys into `processes`, never
/// copies, so accounting updates are visible everywhere at once.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub processes: SlotMap<ProcessKey, ProcessRecord>,
    pub pool: ResourcePool,
    pub ready: ReadyQueue,
    // Admission order; execution visits processes in this order
    pub running: Vec<ProcessKey>,
    pub terminated: Vec<ProcessKey>,
    pub ledger: AllocationLedger,

    by_id: FxHashMap<String, ProcessKey>,
}

impl SimCtx {
    pub fn new(pool: ResourcePool, ready: ReadyQueue) -> Self {
        Self {
            now: 0,
            processes: SlotMap::with_key(),
            pool,
            ready,
            running: Vec::new(),
            terminated: Vec::new(),
            ledger: AllocationLedger::new(),
            by_id: FxHashMap::default(),
        }
    }

    pub fn create_process(
        &mut self,
        id: String,
        arrival: Ticks,
        run_length: Ticks,
        memory: Memory,
        priority: i64,
        deadline: Option<Ticks>,
    ) -> ProcessKey {
        assert!(
            !self.by_id.contains_key(&id),
            "Process id {id} is not unique"
        );
        assert!(run_length > 0, "Process {id} must require at least one tick");

        let key = self.processes.insert(ProcessRecord {
            id: id.clone(),
            arrival,
            run_length,
            memory,
            priority,
            deadline,
            state: ProcessState::Pending,
            executed: 0,
            remaining_quantum: None,
            start_time: None,
            end_time: None,
            reserved_memory: None,
            current_cpu: None,
        });
        self.by_id.insert(id, key);
        key
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn process(&self, key: ProcessKey) -> &ProcessRecord {
        self.processes
            .get(key)
            .expect("Process key missing from process table")
    }

    pub fn process_mut(&mut self, key: ProcessKey) -> &mut ProcessRecord {
        self.processes
            .get_mut(key)
            .expect("Process key missing from process table")
    }

    pub fn key_of(&self, id: &str) -> Option<ProcessKey> {
        self.by_id.get(id).copied()
    }

    fn transition(&mut self, key: ProcessKey, to: ProcessState) -> ProcessState {
        let process = self.process_mut(key);
        let from = process.state;
        assert!(
            from.can_become(to),
            "Illegal transition {from:?} -> {to:?} for process {}",
            process.id
        );
        process.state = to;
        from
    }

    // Return previous state (Pending on submission, Running on re-queue)
    pub fn mark_ready(&mut self, key: ProcessKey) -> ProcessState {
        let from = self.transition(key, ProcessState::Ready);
        let priority = self.process(key).priority;
        self.process_mut(key).current_cpu = None;
        self.ready.push_back(key, priority);
        from
    }

    /// Reserve the full memory requirement on first admission. A process that
    /// already holds its reservation (round-robin resume) always succeeds.
    pub fn try_reserve(&mut self, key: ProcessKey) -> bool {
        let process = self.process(key);
        if process.reserved_memory.is_some() {
            return true;
        }
        let amount = process.memory;
        if !self.pool.try_reserve(amount) {
            return false;
        }
        self.process_mut(key).reserved_memory = Some(amount);
        true
    }

    /// Hand `cpu` to a queued process. Memory must already be reserved.
    pub fn set_running(&mut self, cpu: CpuId, key: ProcessKey) -> ProcessState {
        debug_assert!(
            self.process(key).holds_reservation(),
            "Process {} dispatched without a memory reservation",
            self.process(key).id
        );
        let removed = self.ready.remove(key);
        debug_assert!(removed, "Dispatched process was not queued");

        let from = self.transition(key, ProcessState::Running);
        self.pool.occupy(cpu, key);
        self.process_mut(key).current_cpu = Some(cpu);
        self.running.push(key);

        let now = self.now;
        let id = self.processes[key].id.clone();
        let cpu_name = self.pool.cpu_name(cpu).to_owned();
        self.ledger.open(key, &id, &cpu_name, now);
        from
    }

    /// Take the processor away from a running process and close its span at
    /// the end of the current tick. Memory stays reserved.
    pub fn clear_cpu(&mut self, key: ProcessKey) -> CpuId {
        let cpu = self
            .process(key)
            .current_cpu
            .expect("Running process has no processor");
        let vacated = self.pool.vacate(cpu);
        debug_assert_eq!(vacated, Some(key), "CPU {cpu} ran a different process");

        self.running.retain(|&k| k != key);
        self.process_mut(key).current_cpu = None;
        self.ledger.close(key, self.now + 1);
        cpu
    }

    pub fn mark_terminated(&mut self, key: ProcessKey) -> ProcessState {
        debug_assert!(
            self.process(key).current_cpu.is_none(),
            "Terminating process {} still holds a processor",
            self.process(key).id
        );
        let end = self.now + 1;
        let from = self.transition(key, ProcessState::Terminated);
        let process = self.process_mut(key);
        debug_assert_eq!(process.executed, process.run_length);
        process.end_time = Some(end);
        let reserved = process.reserved_memory.unwrap_or(0);

        self.pool.release(reserved);
        self.terminated.push(key);
        from
    }

    pub fn reserved_by_live_processes(&self) -> Memory {
        self.processes
            .values()
            .filter(|p| p.holds_reservation())
            .map(|p| p.reserved_memory.unwrap_or(0))
            .sum()
    }

    pub fn is_idle(&self) -> bool {
        self.ready.is_empty() && self.running.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SimCtx {
        SimCtx::new(ResourcePool::new(["CPU1"], 100), ReadyQueue::new_line())
    }

    #[test]
    fn requeue_keeps_memory_until_termination() {
        let mut ctx = ctx();
        let p = ctx.create_process("P1".into(), 0, 2, 60, 0, None);

        assert_eq!(ctx.mark_ready(p), ProcessState::Pending);
        assert!(ctx.try_reserve(p));
        ctx.set_running(0, p);
        assert_eq!(ctx.pool.reserved_memory(), 60);

        ctx.clear_cpu(p);
        assert_eq!(ctx.mark_ready(p), ProcessState::Running);
        assert_eq!(ctx.pool.reserved_memory(), 60);
        assert!(ctx.pool.cpu_is_idle(0));

        // Resuming does not reserve twice
        assert!(ctx.try_reserve(p));
        assert_eq!(ctx.pool.reserved_memory(), 60);

        ctx.advance_time(1);
        ctx.set_running(0, p);
        ctx.process_mut(p).executed = 2;
        ctx.clear_cpu(p);
        ctx.mark_terminated(p);

        assert_eq!(ctx.pool.reserved_memory(), 0);
        assert_eq!(ctx.process(p).end_time, Some(2));
        assert_eq!(ctx.process(p).reserved_memory, Some(60));
        assert_eq!(ctx.ledger.spans().len(), 2);
        assert_eq!(ctx.key_of("P1"), Some(p));
        assert!(ctx.is_idle());
    }

    #[test]
    fn reservation_is_refused_when_memory_is_short() {
        let mut ctx = ctx();
        let a = ctx.create_process("A".into(), 0, 1, 70, 0, None);
        let b = ctx.create_process("B".into(), 0, 1, 40, 0, None);

        assert!(ctx.try_reserve(a));
        assert!(!ctx.try_reserve(b));
        assert_eq!(ctx.process(b).reserved_memory, None);
        assert_eq!(ctx.reserved_by_live_processes(), 70);
    }

    #[test]
    #[should_panic(expected = "Illegal transition")]
    fn ready_process_cannot_be_resubmitted() {
        let mut ctx = ctx();
        let p = ctx.create_process("P1".into(), 0, 1, 10, 0, None);
        ctx.mark_ready(p);
        ctx.mark_ready(p);
    }
}
