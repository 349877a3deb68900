use slotmap::new_key_type;

use super::resources::CpuId;

pub type Ticks = u64;
pub type Memory = u64;

new_key_type! {
    pub struct ProcessKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessState {
    Pending,
    Ready,
    Running,
    Terminated,
}

impl ProcessState {
    /// Lifecycle is Pending -> Ready -> Running -> Terminated. The only
    /// back-edge is Running -> Ready, taken on quantum expiry.
    pub fn can_become(self, next: ProcessState) -> bool {
        use ProcessState::*;
        matches!(
            (self, next),
            (Pending, Ready) | (Ready, Running) | (Running, Terminated) | (Running, Ready)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub id: String,
    pub arrival: Ticks,
    pub run_length: Ticks,
    pub memory: Memory,
    pub priority: i64,
    pub deadline: Option<Ticks>,

    pub state: ProcessState,
    pub executed: Ticks,
    // Round-robin only
    pub remaining_quantum: Option<Ticks>,
    pub start_time: Option<Ticks>,
    pub end_time: Option<Ticks>,
    // Set on first admission and kept after termination as the amount used
    pub reserved_memory: Option<Memory>,
    pub current_cpu: Option<CpuId>,
}

impl ProcessRecord {
    /// Whether this record currently pins memory in the pool.
    pub fn holds_reservation(&self) -> bool {
        self.reserved_memory.is_some() && self.state != ProcessState::Terminated
    }

    pub fn is_finished(&self) -> bool {
        self.executed >= self.run_length
    }

    /// Ticks between submission and first execution.
    pub fn wait_time(&self) -> Option<Ticks> {
        self.start_time.map(|start| start - self.arrival)
    }

    /// Ticks between submission and termination.
    pub fn response_time(&self) -> Option<Ticks> {
        self.end_time.map(|end| end - self.arrival)
    }

    pub fn missed_deadline(&self) -> bool {
        match (self.deadline, self.end_time) {
            (Some(deadline), Some(end)) => end > deadline,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ProcessRecord {
        ProcessRecord {
            id: "P1".into(),
            arrival: 3,
            run_length: 4,
            memory: 512,
            priority: 0,
            deadline: Some(8),
            state: ProcessState::Terminated,
            executed: 4,
            remaining_quantum: None,
            start_time: Some(5),
            end_time: Some(9),
            reserved_memory: Some(512),
            current_cpu: None,
        }
    }

    #[test]
    fn wait_and_response_are_measured_from_arrival() {
        let p = record();
        assert_eq!(p.wait_time(), Some(2));
        assert_eq!(p.response_time(), Some(6));
        assert!(p.missed_deadline());
        assert!(!p.holds_reservation());
    }

    #[test]
    fn only_round_robin_back_edge_is_allowed() {
        use ProcessState::*;
        assert!(Running.can_become(Ready));
        assert!(!Ready.can_become(Pending));
        assert!(!Terminated.can_become(Ready));
        assert!(!Pending.can_become(Running));
    }
}
