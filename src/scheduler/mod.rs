pub mod fifo;
pub mod priority;
pub mod round_robin;

use std::fmt;

use crate::core::{ProcessKey, ProcessRecord, ReadyQueue, SimCtx, Ticks};
use crate::error::{Error, Result};
pub use fifo::FifoPolicy;
pub use priority::PriorityPolicy;
pub use round_robin::RoundRobinPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    QuantumExpired,
}

/// Hooks through which a dispatch policy shapes the tick loop. Policies only
/// decide ordering and re-queueing; resources are managed by the driver.
pub trait SchedulingPolicy {
    fn ready_queue(&self) -> ReadyQueue;

    /// Order processes arriving on the same tick before they are queued.
    fn order_arrivals(&self, ctx: &SimCtx, arrivals: &mut [ProcessKey]);

    /// Order in which queued processes compete for free processors.
    fn order_ready_queue(&self, ctx: &SimCtx) -> Vec<ProcessKey> {
        ctx.ready.ordered()
    }

    fn on_admit(&self, _process: &mut ProcessRecord) {}

    /// Runs after the process executed one tick.
    fn on_tick(&self, _process: &mut ProcessRecord) -> TickOutcome {
        TickOutcome::Continue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Fifo,
    RoundRobin { quantum: Ticks },
    Priority,
}

impl Policy {
    /// Parse a configured algorithm name. Names are case-insensitive and
    /// accept spaces or underscores.
    pub fn from_name(name: &str, quantum: Option<i64>) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidAlgorithm {
            name: name.to_owned(),
            reason: reason.to_owned(),
        };

        match name.trim().to_uppercase().replace('_', " ").as_str() {
            "FIFO" | "FCFS" => Ok(Self::Fifo),
            "PRIORITY" => Ok(Self::Priority),
            "ROUND ROBIN" | "ROUNDROBIN" | "RR" => match quantum {
                None => Err(invalid("round robin requires a quantum")),
                Some(q) if q <= 0 => Err(invalid("quantum must be positive")),
                Some(q) => Ok(Self::RoundRobin { quantum: q as Ticks }),
            },
            _ => Err(invalid("expected FIFO, ROUND ROBIN or PRIORITY")),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fifo => "FIFO",
            Self::RoundRobin { .. } => "ROUND ROBIN",
            Self::Priority => "PRIORITY",
        }
    }

    pub const fn quantum(&self) -> Option<Ticks> {
        match self {
            Self::RoundRobin { quantum } => Some(*quantum),
            _ => None,
        }
    }

    fn with_policy<R>(&self, f: impl FnOnce(&dyn SchedulingPolicy) -> R) -> R {
        match *self {
            Self::Fifo => f(&FifoPolicy),
            Self::RoundRobin { quantum } => f(&RoundRobinPolicy::new(quantum)),
            Self::Priority => f(&PriorityPolicy),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl SchedulingPolicy for Policy {
    fn ready_queue(&self) -> ReadyQueue {
        self.with_policy(|p| p.ready_queue())
    }

    fn order_arrivals(&self, ctx: &SimCtx, arrivals: &mut [ProcessKey]) {
        self.with_policy(|p| p.order_arrivals(ctx, arrivals))
    }

    fn order_ready_queue(&self, ctx: &SimCtx) -> Vec<ProcessKey> {
        self.with_policy(|p| p.order_ready_queue(ctx))
    }

    fn on_admit(&self, process: &mut ProcessRecord) {
        self.with_policy(|p| p.on_admit(process))
    }

    fn on_tick(&self, process: &mut ProcessRecord) -> TickOutcome {
        self.with_policy(|p| p.on_tick(process))
    }
}

/// Orders identifiers numerically when both parse as integers, lexically
/// otherwise.
pub(crate) fn compare_ids(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}
