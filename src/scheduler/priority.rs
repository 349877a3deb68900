use super::SchedulingPolicy;
use crate::core::{ProcessKey, ReadyQueue, SimCtx};

/// Static priority, higher value first. The whole queue is re-ranked before
/// each allocation, but a running process is never evicted: priority only
/// decides who gets the next free processor.
pub struct PriorityPolicy;

impl SchedulingPolicy for PriorityPolicy {
    fn ready_queue(&self) -> ReadyQueue {
        ReadyQueue::new_priq()
    }

    // Same-tick arrivals keep submission order; the queue's insertion
    // sequence then breaks priority ties.
    fn order_arrivals(&self, _ctx: &SimCtx, _arrivals: &mut [ProcessKey]) {}
}
