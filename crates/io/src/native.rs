//! Draft files - the working row set as pretty-printed JSON, so the CLI
//! can carry a batch across invocations.

use std::fs;
use std::path::Path;

use signpost_engine::entry::Entry;

pub fn save_drafts(path: &Path, entries: &[Entry]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }
    let json = serde_json::to_string_pretty(entries).map_err(|e| e.to_string())?;
    fs::write(path, json).map_err(|e| e.to_string())
}

pub fn load_drafts(path: &Path) -> Result<Vec<Entry>, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use signpost_engine::entry::{EntryFields, EntryId};
    use tempfile::tempdir;

    #[test]
    fn test_draft_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drafts.json");
        let entries = vec![Entry::new(
            EntryId(3),
            EntryFields {
                property_code: "2010".into(),
                ..EntryFields::default()
            },
        )];
        save_drafts(&path, &entries).unwrap();
        let loaded = load_drafts(&path).unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempdir().unwrap();
        assert!(load_drafts(&dir.path().join("nope.json")).is_err());
    }
}
