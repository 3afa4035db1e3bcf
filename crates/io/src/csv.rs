// CSV export for the signage network feed.
//
// Fixed column order shared with paste-import; dates as YYYY-MM-DD,
// booleans as true/false, poster position as its numeric code. Only
// complete rows are exported, in display order. Export never mutates
// the store; the same text backs both file download and clipboard copy.

use std::path::Path;

use signpost_engine::editor;
use signpost_engine::entry::{Entry, EntryFields};
use signpost_engine::store::EntryStore;

/// Authoritative column order for export and paste-import.
pub const COLUMNS: [&str; 12] = [
    "property_code",
    "terminal_id",
    "vendor_id",
    "inspection_type_id",
    "start_date",
    "end_date",
    "remarks",
    "notice_text",
    "display_duration",
    "poster_type",
    "poster_position",
    "show_on_board",
];

const DATE_FMT: &str = "%Y-%m-%d";

/// Render one row into the fixed column order.
pub fn record_for(fields: &EntryFields) -> [String; 12] {
    [
        fields.property_code.clone(),
        fields.terminal_id.clone(),
        fields.vendor_id.clone(),
        fields.inspection_type_id.clone(),
        fields.start_date.map(|d| d.format(DATE_FMT).to_string()).unwrap_or_default(),
        fields.end_date.map(|d| d.format(DATE_FMT).to_string()).unwrap_or_default(),
        fields.remarks.clone(),
        fields.notice_text.clone(),
        fields.display_duration_secs.to_string(),
        fields.poster_type.as_str().to_string(),
        fields.poster_position.code().to_string(),
        fields.show_on_board.to_string(),
    ]
}

/// Serialize all complete rows, in display order, with the header row.
pub fn export_string(store: &EntryStore) -> Result<String, String> {
    let complete: Vec<&Entry> = store
        .entries()
        .iter()
        .filter(|e| editor::is_complete(&e.fields))
        .collect();
    export_entries(complete.into_iter())
}

/// Serialize an explicit row sequence (already filtered by the caller).
pub fn export_entries<'a>(entries: impl Iterator<Item = &'a Entry>) -> Result<String, String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(COLUMNS).map_err(|e| e.to_string())?;
    for entry in entries {
        writer
            .write_record(record_for(&entry.fields))
            .map_err(|e| e.to_string())?;
    }
    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

/// Write the export text to a file.
pub fn export_file(store: &EntryStore, path: &Path) -> Result<(), String> {
    let text = export_string(store)?;
    std::fs::write(path, text).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use signpost_engine::entry::PosterPosition;

    fn complete(code: &str) -> EntryFields {
        EntryFields {
            property_code: code.into(),
            terminal_id: "h0001A00".into(),
            vendor_id: "0".into(),
            inspection_type_id: "0".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 2, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 2, 1),
            ..EntryFields::default()
        }
    }

    #[test]
    fn test_export_excludes_incomplete_rows() {
        let mut store = EntryStore::new();
        store.add_entry(complete("2010"));
        let mut no_vendor = complete("9999");
        no_vendor.vendor_id.clear();
        store.add_entry(no_vendor);

        let text = export_string(&store).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2, "header plus one data line");
        assert!(lines[1].starts_with("2010,"));
        assert!(!text.contains("9999"));
    }

    #[test]
    fn test_export_preserves_display_order() {
        let mut store = EntryStore::new();
        let a = store.add_entry(complete("2010"));
        store.add_entry(complete("120406"));
        store.reorder(a, 1).unwrap();

        let text = export_string(&store).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].starts_with("120406,"));
        assert!(lines[2].starts_with("2010,"));
    }

    #[test]
    fn test_fields_with_delimiter_and_quotes_are_escaped() {
        let mut store = EntryStore::new();
        let mut fields = complete("2010");
        fields.remarks = "fire door, stairwell \"B\"".into();
        fields.notice_text = "line one\nline two".into();
        store.add_entry(fields);

        let text = export_string(&store).unwrap();
        assert!(text.contains("\"fire door, stairwell \"\"B\"\"\""));
        assert!(text.contains("\"line one\nline two\""));
    }

    #[test]
    fn test_export_does_not_mutate_store() {
        let mut store = EntryStore::new();
        store.add_entry(complete("2010"));
        store.take_events();
        export_string(&store).unwrap();
        assert!(!store.has_pending_events());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_boolean_and_position_rendering() {
        let mut fields = complete("2010");
        fields.poster_position = PosterPosition::TopLeft;
        fields.show_on_board = false;
        let record = record_for(&fields);
        assert_eq!(record[10], "1");
        assert_eq!(record[11], "false");
        assert_eq!(record[9], "template");
    }
}
