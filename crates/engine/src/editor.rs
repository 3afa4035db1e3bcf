//! Row editor - field-level validation, defaulting, and merge updates.
//!
//! Required fields are property code, vendor, and inspection type; a row
//! missing any of them is incomplete and is excluded from export and
//! submission, but it stays in the store with a visible error state.
//! Date-order and duration problems are reported alongside but do not
//! reclassify a complete row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalogs;
use crate::entry::{EntryFields, EntryId, PosterPosition, PosterType};
use crate::store::{EntryStore, StoreError};

/// One field-level problem found by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    MissingPropertyCode,
    MissingVendor,
    MissingInspectionType,
    /// End date earlier than start date.
    DateOrder,
    /// Display duration is zero.
    InvalidDuration,
}

impl std::fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldProblem::MissingPropertyCode => write!(f, "property code is required"),
            FieldProblem::MissingVendor => write!(f, "vendor is required"),
            FieldProblem::MissingInspectionType => write!(f, "inspection type is required"),
            FieldProblem::DateOrder => write!(f, "end date is before start date"),
            FieldProblem::InvalidDuration => write!(f, "display duration must be positive"),
        }
    }
}

/// Structured validation result for one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub problems: Vec<FieldProblem>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    /// Complete means every required field is set; other problems are
    /// surfaced inline without blocking export.
    pub fn is_complete(&self) -> bool {
        !self.problems.iter().any(|p| {
            matches!(
                p,
                FieldProblem::MissingPropertyCode
                    | FieldProblem::MissingVendor
                    | FieldProblem::MissingInspectionType
            )
        })
    }
}

/// Validate one row's fields.
pub fn validate(fields: &EntryFields) -> ValidationReport {
    let mut problems = Vec::new();
    if fields.property_code.is_empty() {
        problems.push(FieldProblem::MissingPropertyCode);
    }
    if fields.vendor_id.is_empty() {
        problems.push(FieldProblem::MissingVendor);
    }
    if fields.inspection_type_id.is_empty() {
        problems.push(FieldProblem::MissingInspectionType);
    }
    if let (Some(start), Some(end)) = (fields.start_date, fields.end_date) {
        if end < start {
            problems.push(FieldProblem::DateOrder);
        }
    }
    if fields.display_duration_secs == 0 {
        problems.push(FieldProblem::InvalidDuration);
    }
    ValidationReport { problems }
}

/// Whether a row passes required-field validation.
pub fn is_complete(fields: &EntryFields) -> bool {
    validate(fields).is_complete()
}

/// A mergeable subset of row fields. `None` leaves the target field
/// untouched; `Some` overwrites it. Used by single-row edits, bulk field
/// edit, and template application alike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryPatch {
    pub property_code: Option<String>,
    pub terminal_id: Option<String>,
    pub vendor_id: Option<String>,
    pub inspection_type_id: Option<String>,
    pub emergency_contact: Option<String>,
    pub notice_text: Option<String>,
    pub remarks: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub display_duration_secs: Option<u32>,
    pub poster_type: Option<PosterType>,
    pub poster_position: Option<PosterPosition>,
    pub show_on_board: Option<bool>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self == &EntryPatch::default()
    }

    /// Capture a full patch from existing fields (template save).
    pub fn from_fields(fields: &EntryFields) -> Self {
        Self {
            property_code: Some(fields.property_code.clone()),
            terminal_id: Some(fields.terminal_id.clone()),
            vendor_id: Some(fields.vendor_id.clone()),
            inspection_type_id: Some(fields.inspection_type_id.clone()),
            emergency_contact: Some(fields.emergency_contact.clone()),
            notice_text: Some(fields.notice_text.clone()),
            remarks: Some(fields.remarks.clone()),
            start_date: fields.start_date,
            end_date: fields.end_date,
            display_duration_secs: Some(fields.display_duration_secs),
            poster_type: Some(fields.poster_type),
            poster_position: Some(fields.poster_position),
            show_on_board: Some(fields.show_on_board),
        }
    }
}

/// Merge a patch into a row through the store's observed update path,
/// running the defaulting rules.
///
/// Editing `notice_text` directly marks the row's dirty flag; changing
/// the inspection type recomputes the notice text and display duration
/// from the catalog unless that flag is set.
pub fn update_entry(
    store: &mut EntryStore,
    catalogs: &Catalogs,
    id: EntryId,
    patch: &EntryPatch,
) -> Result<(), StoreError> {
    if patch.is_empty() {
        // Nothing to merge; avoid firing a change event.
        return store.get(id).map(|_| ()).ok_or(StoreError::NotFound(id));
    }
    let patch = patch.clone();
    let catalogs = catalogs.clone();
    store.update_entry(id, move |entry| {
        let f = &mut entry.fields;
        if let Some(v) = patch.property_code {
            f.property_code = v;
        }
        if let Some(v) = patch.terminal_id {
            f.terminal_id = v;
        }
        if let Some(v) = patch.vendor_id {
            f.vendor_id = v;
        }
        if let Some(v) = patch.emergency_contact {
            f.emergency_contact = v;
        }
        if let Some(v) = patch.notice_text {
            f.notice_text = v;
            entry.notice_text_edited = true;
        }
        if let Some(v) = patch.remarks {
            f.remarks = v;
        }
        if let Some(v) = patch.start_date {
            f.start_date = Some(v);
        }
        if let Some(v) = patch.end_date {
            f.end_date = Some(v);
        }
        if let Some(v) = patch.display_duration_secs {
            f.display_duration_secs = v;
        }
        if let Some(v) = patch.poster_type {
            f.poster_type = v;
        }
        if let Some(v) = patch.poster_position {
            f.poster_position = v;
        }
        if let Some(v) = patch.show_on_board {
            f.show_on_board = v;
        }
        if let Some(v) = patch.inspection_type_id {
            entry.fields.inspection_type_id = v;
            apply_reference_defaults(entry, &catalogs);
        }
    })
}

/// Recompute catalog-derived defaults after an inspection-type change.
/// Never clobbers a notice text the user has edited by hand.
pub fn apply_reference_defaults(entry: &mut crate::entry::Entry, catalogs: &Catalogs) {
    let type_id = entry.fields.inspection_type_id.clone();
    if type_id.is_empty() {
        return;
    }
    if let Some(itype) = catalogs.inspection_type(&type_id) {
        if !entry.notice_text_edited {
            entry.fields.notice_text = itype.notice_text.clone();
        }
        entry.fields.display_duration_secs = catalogs.display_secs_for(&type_id);
    }
}

/// Deep-copy a row (new id, selection reset) and insert it immediately
/// after the source. Returns the new id, or `None` for a stale source id.
pub fn duplicate_entry(store: &mut EntryStore, id: EntryId) -> Option<EntryId> {
    let source = store.get(id)?;
    let fields = source.fields();
    let edited = source.notice_text_edited;
    let new_id = store.insert_after(Some(id), fields);
    // Keep the dirty flag so a later type change behaves like the source.
    if edited {
        let _ = store.update_entry(new_id, |e| e.notice_text_edited = true);
    }
    Some(new_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InspectionType, Vendor};
    use chrono::NaiveDate;

    fn catalogs() -> Catalogs {
        Catalogs {
            vendors: vec![Vendor { id: "0".into(), name: "Acme".into() }],
            inspection_types: vec![InspectionType {
                id: "0".into(),
                name: "Elevator".into(),
                notice_text: "Elevator inspection in progress.".into(),
                display_secs: Some(20),
                template_image_id: None,
            }],
            ..Catalogs::default()
        }
    }

    fn complete_fields() -> EntryFields {
        EntryFields {
            property_code: "2010".into(),
            vendor_id: "0".into(),
            inspection_type_id: "0".into(),
            ..EntryFields::default()
        }
    }

    #[test]
    fn test_missing_vendor_is_incomplete() {
        let mut fields = complete_fields();
        fields.vendor_id.clear();
        let report = validate(&fields);
        assert!(!report.is_complete());
        assert!(report.problems.contains(&FieldProblem::MissingVendor));
    }

    #[test]
    fn test_date_order_problem_does_not_make_incomplete() {
        let mut fields = complete_fields();
        fields.start_date = NaiveDate::from_ymd_opt(2025, 2, 10);
        fields.end_date = NaiveDate::from_ymd_opt(2025, 2, 1);
        let report = validate(&fields);
        assert!(!report.is_valid());
        assert!(report.is_complete());
        assert!(report.problems.contains(&FieldProblem::DateOrder));
    }

    #[test]
    fn test_zero_duration_flagged() {
        let mut fields = complete_fields();
        fields.display_duration_secs = 0;
        assert!(validate(&fields).problems.contains(&FieldProblem::InvalidDuration));
    }

    #[test]
    fn test_type_change_applies_catalog_defaults() {
        let cats = catalogs();
        let mut store = EntryStore::new();
        let id = store.add_entry(EntryFields::default());
        let patch = EntryPatch {
            inspection_type_id: Some("0".into()),
            ..EntryPatch::default()
        };
        update_entry(&mut store, &cats, id, &patch).unwrap();
        let entry = store.get(id).unwrap();
        assert_eq!(entry.fields.notice_text, "Elevator inspection in progress.");
        assert_eq!(entry.fields.display_duration_secs, 20);
        assert!(!entry.notice_text_edited);
    }

    #[test]
    fn test_manual_notice_text_not_clobbered_by_defaults() {
        let cats = catalogs();
        let mut store = EntryStore::new();
        let id = store.add_entry(EntryFields::default());
        let manual = EntryPatch {
            notice_text: Some("Keep this wording".into()),
            ..EntryPatch::default()
        };
        update_entry(&mut store, &cats, id, &manual).unwrap();
        let retype = EntryPatch {
            inspection_type_id: Some("0".into()),
            ..EntryPatch::default()
        };
        update_entry(&mut store, &cats, id, &retype).unwrap();
        let entry = store.get(id).unwrap();
        assert_eq!(entry.fields.notice_text, "Keep this wording");
        assert!(entry.notice_text_edited);
        // Duration defaulting still applies.
        assert_eq!(entry.fields.display_duration_secs, 20);
    }

    #[test]
    fn test_empty_patch_fires_no_event() {
        let cats = catalogs();
        let mut store = EntryStore::new();
        let id = store.add_entry(EntryFields::default());
        store.take_events();
        update_entry(&mut store, &cats, id, &EntryPatch::default()).unwrap();
        assert!(store.take_events().is_empty());
    }

    #[test]
    fn test_update_stale_id_is_not_found() {
        let cats = catalogs();
        let mut store = EntryStore::new();
        let patch = EntryPatch { remarks: Some("x".into()), ..EntryPatch::default() };
        let err = update_entry(&mut store, &cats, EntryId(5), &patch);
        assert_eq!(err, Err(StoreError::NotFound(EntryId(5))));
    }

    #[test]
    fn test_duplicate_inserts_after_source_with_new_id() {
        let mut store = EntryStore::new();
        let a = store.add_entry(complete_fields());
        let b = store.add_entry(EntryFields::default());
        store.toggle_select(a);
        let dup = duplicate_entry(&mut store, a).unwrap();
        assert_ne!(dup, a);
        assert_eq!(store.index_of(dup), Some(1));
        assert_eq!(store.index_of(b), Some(2));
        let copy = store.get(dup).unwrap();
        assert!(!copy.selected);
        assert_eq!(copy.fields, store.get(a).unwrap().fields);
    }
}
