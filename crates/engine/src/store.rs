//! EntryStore - the authoritative ordered row collection.
//!
//! Key invariants:
//! - Row ids are unique for the lifetime of the session and never reused.
//! - Row order is significant (export order = display order) and changes
//!   only through explicit reorder/insert/delete, never by resorting.
//! - All mutation goes through the narrow entry points here so every
//!   change lands on the event queue exactly once.
//! - Filtering never deletes rows; it only changes which rows the view
//!   and bulk select-all consider. Filter changes do not clear selection.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::entry::{Entry, EntryFields, EntryId};
use crate::events::StoreEvent;

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Operation referenced a row id no longer present. Treated as a
    /// stale-UI race by callers, never fatal.
    NotFound(EntryId),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "row {} not found", id),
        }
    }
}

impl std::error::Error for StoreError {}

/// Filter descriptor over the row collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "field", content = "value")]
pub enum Filter {
    /// Exact match on property code.
    PropertyCode(String),
    /// Exact match on vendor id.
    VendorId(String),
    /// Exact match on inspection type id.
    InspectionTypeId(String),
    /// Case-insensitive substring over the free-text fields.
    Text(String),
}

impl Filter {
    pub fn matches(&self, entry: &Entry) -> bool {
        let f = &entry.fields;
        match self {
            Filter::PropertyCode(code) => f.property_code == *code,
            Filter::VendorId(id) => f.vendor_id == *id,
            Filter::InspectionTypeId(id) => f.inspection_type_id == *id,
            Filter::Text(needle) => {
                let needle = needle.to_lowercase();
                [&f.notice_text, &f.remarks, &f.emergency_contact, &f.terminal_id]
                    .iter()
                    .any(|s| s.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Ordered row collection plus selection and filter state.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
    next_id: u64,
    selection: FxHashSet<EntryId>,
    filter: Option<Filter>,
    events: Vec<StoreEvent>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn index_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// The id the next `add_entry` will allocate.
    pub fn peek_next_id(&self) -> EntryId {
        EntryId(self.next_id)
    }

    // -------------------------------------------------------------------------
    // Mutation entry points
    // -------------------------------------------------------------------------

    /// Append a new row with a freshly allocated id.
    pub fn add_entry(&mut self, fields: EntryFields) -> EntryId {
        let id = self.alloc_id();
        self.entries.push(Entry::new(id, fields));
        self.events.push(StoreEvent::EntryAdded { id });
        id
    }

    /// Insert a new row immediately after `after`; appends at the end when
    /// `after` is `None` or no longer present.
    pub fn insert_after(&mut self, after: Option<EntryId>, fields: EntryFields) -> EntryId {
        let id = self.alloc_id();
        let index = after
            .and_then(|a| self.index_of(a))
            .map(|i| i + 1)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, Entry::new(id, fields));
        self.events.push(StoreEvent::EntryAdded { id });
        id
    }

    /// Delete a row. A no-op (no event) when the id is absent.
    pub fn remove_entry(&mut self, id: EntryId) {
        let Some(index) = self.index_of(id) else { return };
        self.entries.remove(index);
        self.selection.remove(&id);
        self.events.push(StoreEvent::EntryRemoved { id });
    }

    /// Run a closure against one row through the observed update path.
    /// Field-merge semantics (and defaulting) live in `editor::update_entry`,
    /// which funnels through here.
    pub fn update_entry<F>(&mut self, id: EntryId, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Entry),
    {
        let entry = self.get_mut(id).ok_or(StoreError::NotFound(id))?;
        f(entry);
        self.events.push(StoreEvent::EntryChanged { id });
        Ok(())
    }

    /// Move a row to `target_index`, clamping out-of-range targets to the
    /// nearest valid boundary.
    pub fn reorder(&mut self, id: EntryId, target_index: usize) -> Result<(), StoreError> {
        let from = self.index_of(id).ok_or(StoreError::NotFound(id))?;
        let entry = self.entries.remove(from);
        let to = target_index.min(self.entries.len());
        self.entries.insert(to, entry);
        if to != from {
            self.events.push(StoreEvent::Reordered { id, index: to });
        }
        Ok(())
    }

    /// Drop every row and the selection. Ids are not reset; they stay
    /// unique for the whole session.
    pub fn clear(&mut self) {
        if self.entries.is_empty() && self.selection.is_empty() {
            return;
        }
        self.entries.clear();
        self.selection.clear();
        self.events.push(StoreEvent::Cleared);
    }

    /// Replace the collection wholesale (recovery restore). The id counter
    /// resumes above the highest restored id.
    pub fn restore(&mut self, entries: Vec<Entry>) {
        self.next_id = entries
            .iter()
            .map(|e| e.id.0 + 1)
            .max()
            .unwrap_or(self.next_id)
            .max(self.next_id);
        self.entries = entries;
        self.selection.clear();
        self.events.push(StoreEvent::Cleared);
    }

    // -------------------------------------------------------------------------
    // Filter
    // -------------------------------------------------------------------------

    pub fn set_filter(&mut self, filter: Filter) {
        if self.filter.as_ref() == Some(&filter) {
            return;
        }
        self.filter = Some(filter);
        self.events.push(StoreEvent::FilterChanged);
    }

    pub fn clear_filter(&mut self) {
        if self.filter.take().is_some() {
            self.events.push(StoreEvent::FilterChanged);
        }
    }

    pub fn active_filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Whether a row passes the active filter (all rows pass when none).
    pub fn is_visible(&self, entry: &Entry) -> bool {
        self.filter.as_ref().map_or(true, |f| f.matches(entry))
    }

    /// Rows passing the active filter, in display order.
    pub fn visible_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| self.is_visible(e))
    }

    pub fn visible_count(&self) -> usize {
        self.visible_entries().count()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn toggle_select(&mut self, id: EntryId) {
        let Some(index) = self.index_of(id) else { return };
        let now_selected = !self.selection.contains(&id);
        if now_selected {
            self.selection.insert(id);
        } else {
            self.selection.remove(&id);
        }
        self.entries[index].selected = now_selected;
        self.events.push(StoreEvent::SelectionChanged);
    }

    /// Select every row, or only rows passing the active filter.
    pub fn select_all(&mut self, visible_only: bool) {
        let mut changed = false;
        let filter = self.filter.clone();
        for entry in &mut self.entries {
            let eligible = !visible_only || filter.as_ref().map_or(true, |f| f.matches(entry));
            if eligible && !entry.selected {
                entry.selected = true;
                self.selection.insert(entry.id);
                changed = true;
            }
        }
        if changed {
            self.events.push(StoreEvent::SelectionChanged);
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        for entry in &mut self.entries {
            entry.selected = false;
        }
        self.events.push(StoreEvent::SelectionChanged);
    }

    pub fn is_selected(&self, id: EntryId) -> bool {
        self.selection.contains(&id)
    }

    pub fn selection_count(&self) -> usize {
        self.selection.len()
    }

    /// Selected row ids in display order (not hash order).
    pub fn selected_ids(&self) -> Vec<EntryId> {
        self.entries
            .iter()
            .filter(|e| self.selection.contains(&e.id))
            .map(|e| e.id)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Drain events accumulated since the last drain.
    pub fn take_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    // -------------------------------------------------------------------------
    // Internal
    // -------------------------------------------------------------------------

    fn alloc_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }
}
