use super::process::{Memory, ProcessKey};

// Index into the pool's processor table
pub type CpuId = usize;

#[derive(Debug)]
pub struct CpuState {
    pub id: CpuId,
    pub name: String,
    pub current: Option<ProcessKey>,
}

/// Processor slots plus a memory ledger. A process reserves memory once, on
/// first admission, and keeps it until it terminates.
#[derive(Debug)]
pub struct ResourcePool {
    pub cpus: Vec<CpuState>,
    total_memory: Memory,
    reserved_memory: Memory,
}

impl ResourcePool {
    pub fn new<I, S>(processor_names: I, total_memory: Memory) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cpus: Vec<CpuState> = processor_names
            .into_iter()
            .enumerate()
            .map(|(id, name)| CpuState {
                id,
                name: name.into(),
                current: None,
            })
            .collect();
        assert!(!cpus.is_empty(), "Resource pool requires at least one processor");

        Self {
            cpus,
            total_memory,
            reserved_memory: 0,
        }
    }

    pub fn total_memory(&self) -> Memory {
        self.total_memory
    }

    pub fn reserved_memory(&self) -> Memory {
        self.reserved_memory
    }

    pub fn free_memory(&self) -> Memory {
        self.total_memory - self.reserved_memory
    }

    /// Reserve `amount` if it fits. Returns false and leaves the ledger
    /// untouched otherwise.
    pub fn try_reserve(&mut self, amount: Memory) -> bool {
        if amount > self.free_memory() {
            return false;
        }
        self.reserved_memory += amount;
        true
    }

    pub fn release(&mut self, amount: Memory) {
        assert!(
            amount <= self.reserved_memory,
            "Releasing {amount} but only {} reserved",
            self.reserved_memory
        );
        self.reserved_memory -= amount;
    }

    pub fn cpu_is_idle(&self, cpu: CpuId) -> bool {
        self.cpus[cpu].current.is_none()
    }

    // Lowest free index wins so allocation stays deterministic
    pub fn pick_idle_cpu(&self) -> Option<CpuId> {
        self.cpus
            .iter()
            .find(|cpu| cpu.current.is_none())
            .map(|cpu| cpu.id)
    }

    pub fn busy_cpus(&self) -> usize {
        self.cpus.iter().filter(|cpu| cpu.current.is_some()).count()
    }

    pub fn cpu_name(&self, cpu: CpuId) -> &str {
        &self.cpus[cpu].name
    }

    pub fn occupy(&mut self, cpu: CpuId, process: ProcessKey) {
        debug_assert!(
            self.cpus[cpu].current.is_none(),
            "CPU {cpu} already running a process"
        );
        self.cpus[cpu].current = Some(process);
    }

    pub fn vacate(&mut self, cpu: CpuId) -> Option<ProcessKey> {
        self.cpus[cpu].current.take()
    }
}
