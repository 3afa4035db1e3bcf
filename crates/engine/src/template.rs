//! Named entry templates - a saved subset of field values reusable across
//! rows. Stored on the remote side (template CRUD lives in the client
//! crate); applying one follows the same merge semantics as bulk edit.

use serde::{Deserialize, Serialize};

use crate::editor::EntryPatch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub fields: EntryPatch,
}

impl Template {
    pub fn new(name: impl Into<String>, fields: EntryPatch) -> Self {
        Self { name: name.into(), fields }
    }
}
