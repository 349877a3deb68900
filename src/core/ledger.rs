use rustc_hash::FxHashMap;
use serde::Serialize;

use super::process::{ProcessKey, Ticks};

/// One contiguous residency of a process on a processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationSpan {
    pub process: String,
    pub processor: String,
    pub start: Ticks,
    pub end: Option<Ticks>,
}

impl AllocationSpan {
    pub fn duration(&self) -> Option<Ticks> {
        self.end.map(|end| end - self.start)
    }
}

/// Append-only span log. At most one span per process is open at a time.
#[derive(Debug, Default)]
pub struct AllocationLedger {
    spans: Vec<AllocationSpan>,
    open: FxHashMap<ProcessKey, usize>,
}

impl AllocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, key: ProcessKey, process: &str, processor: &str, start: Ticks) {
        assert!(
            !self.open.contains_key(&key),
            "Process {process} already has an open allocation span"
        );
        self.open.insert(key, self.spans.len());
        self.spans.push(AllocationSpan {
            process: process.to_owned(),
            processor: processor.to_owned(),
            start,
            end: None,
        });
    }

    pub fn close(&mut self, key: ProcessKey, end: Ticks) {
        let index = self
            .open
            .remove(&key)
            .expect("Closing an allocation span that was never opened");
        let span = &mut self.spans[index];
        assert!(span.end.is_none(), "Allocation span closed twice");
        assert!(end > span.start, "Allocation span must cover at least one tick");
        span.end = Some(end);
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn has_open(&self, key: ProcessKey) -> bool {
        self.open.contains_key(&key)
    }

    pub fn spans(&self) -> &[AllocationSpan] {
        &self.spans
    }

    pub fn into_spans(self) -> Vec<AllocationSpan> {
        self.spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn spans_keep_opening_order() {
        let mut keys: SlotMap<ProcessKey, ()> = SlotMap::with_key();
        let a = keys.insert(());
        let b = keys.insert(());

        let mut ledger = AllocationLedger::new();
        ledger.open(a, "A", "CPU1", 0);
        ledger.open(b, "B", "CPU2", 0);
        ledger.close(b, 2);
        ledger.open(b, "B", "CPU2", 3);
        ledger.close(a, 4);

        let spans = ledger.spans();
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].end, Some(4));
        assert_eq!(spans[1].duration(), Some(2));
        assert_eq!(spans[2].end, None);
        assert!(ledger.has_open(b));
        assert_eq!(ledger.open_count(), 1);
    }

    #[test]
    #[should_panic(expected = "never opened")]
    fn closing_twice_fails_loudly() {
        let mut keys: SlotMap<ProcessKey, ()> = SlotMap::with_key();
        let a = keys.insert(());

        let mut ledger = AllocationLedger::new();
        ledger.open(a, "A", "CPU1", 0);
        ledger.close(a, 1);
        ledger.close(a, 2);
    }
}
