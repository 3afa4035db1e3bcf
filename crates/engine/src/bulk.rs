//! Multi-row operations layered on the row editor.
//!
//! Every operation leaves the store consistent and is idempotent under
//! repeated no-op invocation: deleting an empty selection, pasting with
//! an empty clipboard, or bulk-editing nothing all succeed without
//! touching the store or firing events.

use serde::Serialize;

use crate::catalog::Catalogs;
use crate::clipboard::Clipboard;
use crate::editor::{self, EntryPatch};
use crate::entry::EntryId;
use crate::store::{EntryStore, StoreError};
use crate::template::Template;

/// Delete every selected row and clear the selection. Always succeeds,
/// possibly as a no-op.
pub fn bulk_delete(store: &mut EntryStore) -> usize {
    let ids = store.selected_ids();
    for id in &ids {
        store.remove_entry(*id);
    }
    store.clear_selection();
    ids.len()
}

/// Apply a field patch to every selected row through the editor's update
/// path, so defaulting rules still run. Returns the number of rows
/// touched; an empty selection or empty patch is a no-op.
pub fn bulk_edit(
    store: &mut EntryStore,
    catalogs: &Catalogs,
    patch: &EntryPatch,
) -> Result<usize, StoreError> {
    if patch.is_empty() {
        return Ok(0);
    }
    let ids = store.selected_ids();
    for id in &ids {
        editor::update_entry(store, catalogs, *id, patch)?;
    }
    Ok(ids.len())
}

/// Drop a dragged row onto a target row.
///
/// The new index is the target's current index in both directions: the
/// removal shift absorbs the insert-after-below / insert-before-above
/// adjustment. Dropping a row onto itself changes nothing.
pub fn drag_reorder(
    store: &mut EntryStore,
    source: EntryId,
    target: EntryId,
) -> Result<(), StoreError> {
    if source == target {
        return Ok(());
    }
    store.index_of(source).ok_or(StoreError::NotFound(source))?;
    let target_index = store.index_of(target).ok_or(StoreError::NotFound(target))?;
    store.reorder(source, target_index)
}

/// Capture a deep copy of a row into the clipboard, overwriting any
/// prior content. A stale id is ignored.
pub fn copy_entry(store: &EntryStore, clipboard: &mut Clipboard, id: EntryId) {
    if let Some(entry) = store.get(id) {
        clipboard.set(entry.fields());
    }
}

/// Insert a new row from the clipboard immediately after `after` (or at
/// the end when absent/stale). No-op with an empty clipboard.
pub fn paste_entry(
    store: &mut EntryStore,
    clipboard: &Clipboard,
    after: Option<EntryId>,
) -> Option<EntryId> {
    let fields = clipboard.get()?.clone();
    Some(store.insert_after(after, fields))
}

/// Capture a row's content fields as a named template.
pub fn save_template(store: &EntryStore, id: EntryId, name: &str) -> Option<Template> {
    let entry = store.get(id)?;
    Some(Template::new(name, EntryPatch::from_fields(&entry.fields)))
}

/// Merge a template into a target row, or into a freshly added row when
/// no target is given. Returns the affected row id.
pub fn apply_template(
    store: &mut EntryStore,
    catalogs: &Catalogs,
    template: &Template,
    target: Option<EntryId>,
) -> Result<EntryId, StoreError> {
    let id = match target {
        Some(id) => id,
        None => store.add_entry(Default::default()),
    };
    editor::update_entry(store, catalogs, id, &template.fields)?;
    Ok(id)
}

/// Derived counts for the toolbar and empty-state view. Recomputed from
/// the store after every mutation; holds no state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub visible: usize,
    pub selected: usize,
    pub complete: usize,
    pub incomplete: usize,
}

pub fn stats(store: &EntryStore) -> Stats {
    let complete = store
        .entries()
        .iter()
        .filter(|e| editor::is_complete(&e.fields))
        .count();
    Stats {
        total: store.len(),
        visible: store.visible_count(),
        selected: store.selection_count(),
        complete,
        incomplete: store.len() - complete,
    }
}
