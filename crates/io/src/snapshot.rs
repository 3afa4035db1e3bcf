//! Local recovery snapshot.
//!
//! One JSON file holding the full row collection (incomplete rows
//! included) and a timestamp. Written when the autosave debounce fires,
//! overwriting the previous save; read once at session start to offer
//! one-shot recovery; deleted on successful submission or an explicit
//! discard. Restoration is never automatic.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use signpost_engine::entry::Entry;
use signpost_engine::store::EntryStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub entries: Vec<Entry>,
    pub saved_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn capture(store: &EntryStore) -> Self {
        Self {
            entries: store.entries().to_vec(),
            saved_at: Utc::now(),
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("signpost")
            .join("recovery.json")
    }

    pub fn load() -> Option<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
    }

    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())?;
        log::debug!("recovery snapshot saved ({} rows)", self.entries.len());
        Ok(())
    }

    /// Replace the store contents with the snapshot (accepted recovery).
    pub fn restore_into(self, store: &mut EntryStore) {
        store.restore(self.entries);
    }

    pub fn discard() {
        Self::discard_at(&Self::default_path());
    }

    pub fn discard_at(path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("could not discard recovery snapshot: {}", e);
            }
        }
    }
}
