use crate::core::{Memory, Ticks};

/// A validated process description, as handed to the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub id: String,
    pub arrival: Ticks,
    pub run_length: Ticks,
    pub memory: Memory,
    pub priority: i64,
    pub deadline: Option<Ticks>,
}

impl ProcessSpec {
    pub fn new(id: impl Into<String>, arrival: Ticks, run_length: Ticks, memory: Memory) -> Self {
        Self {
            id: id.into(),
            arrival,
            run_length,
            memory,
            priority: 0,
            deadline: None,
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_deadline(mut self, deadline: Ticks) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    pub processor_ids: Vec<String>,
    pub total_memory: Memory,
}

impl ResourceSpec {
    pub fn new<I, S>(processor_ids: I, total_memory: Memory) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            processor_ids: processor_ids.into_iter().map(Into::into).collect(),
            total_memory,
        }
    }
}
