use super::{SchedulingPolicy, compare_ids};
use crate::core::{ProcessKey, ReadyQueue, SimCtx};

/// Strict arrival order, identifiers break ties. A process keeps its
/// processor until it terminates.
pub struct FifoPolicy;

impl SchedulingPolicy for FifoPolicy {
    fn ready_queue(&self) -> ReadyQueue {
        ReadyQueue::new_line()
    }

    fn order_arrivals(&self, ctx: &SimCtx, arrivals: &mut [ProcessKey]) {
        arrivals.sort_by(|&a, &b| compare_ids(&ctx.process(a).id, &ctx.process(b).id));
    }
}
