use crate::core::{CpuId, Memory, ProcessKey, ProcessState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    StateChange {
        process: ProcessKey,
        from: ProcessState,
        to: ProcessState,
    },
    CpuCurrentChange {
        cpu: CpuId,
        from: Option<ProcessKey>,
        to: Option<ProcessKey>,
    },
    // Skipped this tick for lack of memory; stays queued
    AdmissionDeferred {
        process: ProcessKey,
        requested: Memory,
        available: Memory,
    },
    // CPU idle even after allocation
    CpuIdle {
        cpu: CpuId,
    },
}
