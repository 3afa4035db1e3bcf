//! Entry - one signage-announcement draft row.
//!
//! Rows live in the `EntryStore` and are only mutated through its update
//! paths so every change can be observed for autosave and re-render.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display duration fallback when the inspection-type catalog has no default.
pub const DEFAULT_DISPLAY_SECS: u32 = 10;

/// Process-local row identifier. Monotonically assigned, never reused
/// within a session, even after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Poster rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosterType {
    /// Image resolved from the inspection-type catalog.
    Template,
    /// Free-form poster, no image binding.
    Custom,
}

impl PosterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterType::Template => "template",
            PosterType::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "template" => Some(PosterType::Template),
            "custom" => Some(PosterType::Custom),
            _ => None,
        }
    }
}

impl Default for PosterType {
    fn default() -> Self {
        PosterType::Template
    }
}

/// Screen placement of the poster. Serialized as a numeric code in CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosterPosition {
    Full,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl PosterPosition {
    pub fn code(&self) -> u8 {
        match self {
            PosterPosition::Full => 0,
            PosterPosition::TopLeft => 1,
            PosterPosition::TopRight => 2,
            PosterPosition::BottomLeft => 3,
            PosterPosition::BottomRight => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PosterPosition::Full),
            1 => Some(PosterPosition::TopLeft),
            2 => Some(PosterPosition::TopRight),
            3 => Some(PosterPosition::BottomLeft),
            4 => Some(PosterPosition::BottomRight),
            _ => None,
        }
    }
}

impl Default for PosterPosition {
    fn default() -> Self {
        PosterPosition::Full
    }
}

/// The entry-content fields of a row, without identity or UI state.
///
/// This is what the clipboard captures, what paste-import produces, and
/// what `addRow` takes as initial values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryFields {
    pub property_code: String,
    pub terminal_id: String,
    pub vendor_id: String,
    pub inspection_type_id: String,
    pub emergency_contact: String,
    pub notice_text: String,
    pub remarks: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub display_duration_secs: u32,
    pub poster_type: PosterType,
    pub poster_position: PosterPosition,
    pub show_on_board: bool,
}

impl Default for EntryFields {
    fn default() -> Self {
        Self {
            property_code: String::new(),
            terminal_id: String::new(),
            vendor_id: String::new(),
            inspection_type_id: String::new(),
            emergency_contact: String::new(),
            notice_text: String::new(),
            remarks: String::new(),
            start_date: None,
            end_date: None,
            display_duration_secs: DEFAULT_DISPLAY_SECS,
            poster_type: PosterType::default(),
            poster_position: PosterPosition::default(),
            show_on_board: true,
        }
    }
}

/// One announcement draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    #[serde(flatten)]
    pub fields: EntryFields,
    /// Set when the user edits `notice_text` directly; programmatic
    /// defaulting never flips it, and never overwrites an edited text.
    #[serde(default)]
    pub notice_text_edited: bool,
    /// Transient UI checkbox, not persisted past the session.
    #[serde(skip)]
    pub selected: bool,
}

impl Entry {
    pub fn new(id: EntryId, fields: EntryFields) -> Self {
        Self {
            id,
            fields,
            notice_text_edited: false,
            selected: false,
        }
    }

    /// Content fields only, for clipboard capture and duplication.
    pub fn fields(&self) -> EntryFields {
        self.fields.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_codes_roundtrip() {
        for code in 0..=4u8 {
            let pos = PosterPosition::from_code(code).unwrap();
            assert_eq!(pos.code(), code);
        }
        assert_eq!(PosterPosition::from_code(5), None);
    }

    #[test]
    fn test_poster_type_parse() {
        assert_eq!(PosterType::parse("template"), Some(PosterType::Template));
        assert_eq!(PosterType::parse("custom"), Some(PosterType::Custom));
        assert_eq!(PosterType::parse("banner"), None);
    }

    #[test]
    fn test_selected_flag_not_serialized() {
        let mut entry = Entry::new(EntryId(7), EntryFields::default());
        entry.selected = true;
        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert!(!back.selected, "selected must not survive serialization");
        assert_eq!(back.id, EntryId(7));
    }
}
