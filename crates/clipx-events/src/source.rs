//! Event source abstraction.
//!
//! Detector outputs are produced elsewhere; the pipeline only needs to ask
//! for "all events matching this query".

use clipx_models::{EventQuery, EventRecord};

use crate::error::EventResult;

/// Something that can answer tag-type queries with event rows.
pub trait EventSource {
    /// Return every event matching `query`, in source order.
    ///
    /// No matches is an empty vector, not an error.
    fn events(&self, query: &EventQuery) -> EventResult<Vec<EventRecord>>;
}

/// Event source over an in-memory collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventSource {
    events: Vec<EventRecord>,
}

impl MemoryEventSource {
    pub fn new(events: Vec<EventRecord>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for MemoryEventSource {
    fn events(&self, query: &EventQuery) -> EventResult<Vec<EventRecord>> {
        Ok(self
            .events
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect())
    }
}
