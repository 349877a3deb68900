use keyed_priority_queue::KeyedPriorityQueue;
use std::cmp::Ordering;
use std::collections::VecDeque;

use super::process::ProcessKey;

/// Ordering key for the priority queue: higher priority first, then earlier
/// insertion.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Rank {
    pub priority: i64,
    pub seq: u64,
}

// KeyedPriorityQueue is a max-heap, so a smaller seq must compare greater
impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Admitted-but-not-running processes, in the order they compete for
/// processor slots.
#[derive(Debug)]
pub enum ReadyQueue {
    /// A single line: FIFO and round-robin.
    Line { entries: VecDeque<ProcessKey> },
    /// Re-ranked by priority before every allocation attempt.
    Priq {
        entries: KeyedPriorityQueue<ProcessKey, Rank>,
        next_seq: u64,
    },
}

impl ReadyQueue {
    pub fn new_line() -> Self {
        Self::Line {
            entries: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            entries: KeyedPriorityQueue::new(),
            next_seq: 0,
        }
    }

    pub fn push_back(&mut self, process: ProcessKey, priority: i64) {
        debug_assert!(!self.contains(process), "Process already queued");
        match self {
            Self::Line { entries } => entries.push_back(process),
            Self::Priq { entries, next_seq } => {
                let seq = *next_seq;
                *next_seq += 1;
                entries.push(process, Rank { priority, seq });
            }
        }
    }

    pub fn remove(&mut self, process: ProcessKey) -> bool {
        match self {
            Self::Line { entries } => match entries.iter().position(|&k| k == process) {
                Some(index) => entries.remove(index).is_some(),
                None => false,
            },
            Self::Priq { entries, .. } => entries.remove(&process).is_some(),
        }
    }

    /// Snapshot of the queue in competition order.
    pub fn ordered(&self) -> Vec<ProcessKey> {
        match self {
            Self::Line { entries } => entries.iter().copied().collect(),
            Self::Priq { entries, .. } => {
                let mut ranked: Vec<(ProcessKey, Rank)> =
                    entries.iter().map(|(&k, &rank)| (k, rank)).collect();
                ranked.sort_by(|a, b| b.1.cmp(&a.1));
                ranked.into_iter().map(|(k, _)| k).collect()
            }
        }
    }

    pub fn contains(&self, process: ProcessKey) -> bool {
        match self {
            Self::Line { entries } => entries.contains(&process),
            Self::Priq { entries, .. } => entries.get_priority(&process).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Line { entries } => entries.len(),
            Self::Priq { entries, .. } => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
