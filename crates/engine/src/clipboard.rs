//! Single-slot row clipboard.
//!
//! Holds at most one captured row's content fields (id and selection
//! stripped). Each copy overwrites the slot; it dies with the session.

use crate::entry::EntryFields;

#[derive(Debug, Default)]
pub struct Clipboard {
    slot: Option<EntryFields>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, fields: EntryFields) {
        self.slot = Some(fields);
    }

    pub fn get(&self) -> Option<&EntryFields> {
        self.slot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
