pub mod driver;
pub mod event;
pub mod ledger;
pub mod observer;
pub mod process;
pub mod queue;
pub mod resources;
pub mod state;

pub use driver::SchedCore;
pub use event::SimEvent;
pub use ledger::{AllocationLedger, AllocationSpan};
pub use observer::Observer;
pub use process::{Memory, ProcessKey, ProcessRecord, ProcessState, Ticks};
pub use queue::{Rank, ReadyQueue};
pub use resources::{CpuId, CpuState, ResourcePool};
pub use state::SimCtx;
