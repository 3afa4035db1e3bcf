//! Event types for store change notifications.
//!
//! Every mutation that goes through the store's update paths appends one
//! event; the session drains the queue to arm autosave, and derived
//! views recompute off the same drain. No-op invocations append nothing.

use crate::entry::EntryId;

/// Events emitted by `EntryStore` mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A row was appended or inserted.
    EntryAdded { id: EntryId },
    /// A row was deleted.
    EntryRemoved { id: EntryId },
    /// A row's fields changed through the update path.
    EntryChanged { id: EntryId },
    /// A row moved to a new display index.
    Reordered { id: EntryId, index: usize },
    /// The selection set changed.
    SelectionChanged,
    /// The active filter changed.
    FilterChanged,
    /// The whole store was cleared (successful submission) or replaced
    /// (recovery restore).
    Cleared,
}

impl StoreEvent {
    /// Whether this event reflects row data worth snapshotting.
    /// Selection and filter are transient view state; autosave ignores them.
    pub fn affects_rows(&self) -> bool {
        !matches!(self, StoreEvent::SelectionChanged | StoreEvent::FilterChanged)
    }
}

/// Simple event collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<StoreEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = StoreEvent>) {
        self.events.extend(events);
    }

    pub fn events(&self) -> &[StoreEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Ids of rows added, in event order.
    pub fn added_ids(&self) -> Vec<EntryId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StoreEvent::EntryAdded { id } => Some(*id),
                _ => None,
            })
            .collect()
    }
}
