//! Paste-import: multi-line delimiter-separated text from an external
//! spreadsheet, parsed into new rows.
//!
//! Columns map positionally to the export order in `csv::COLUMNS`. The
//! scanner is a two-state machine (normal / in-quotes): a field that
//! begins with `"` runs across embedded delimiters and newlines until
//! the matching close, with `""` decoding to a literal quote. Malformed
//! records are skipped and reported individually; the rest import.

use chrono::NaiveDate;

use signpost_engine::entry::{EntryFields, PosterPosition, PosterType, DEFAULT_DISPLAY_SECS};
use signpost_engine::store::EntryStore;

use crate::csv::COLUMNS;

/// One record the importer refused, with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub reason: String,
}

/// Parse result: rows ready for insertion plus the per-line reject list.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub records: Vec<EntryFields>,
    pub skipped: Vec<SkippedLine>,
}

impl ImportOutcome {
    pub fn imported(&self) -> usize {
        self.records.len()
    }

    /// One-line summary for the toast notifier.
    pub fn summary(&self) -> String {
        format!("{} imported, {} skipped", self.records.len(), self.skipped.len())
    }
}

/// Parse pasted text into row fields. Does not touch any store.
pub fn parse_paste(text: &str) -> ImportOutcome {
    let delimiter = detect_delimiter(text);
    let (raw, mut skipped) = scan_records(text, delimiter);
    let mut records = Vec::new();
    for record in raw {
        // Exported text starts with the fixed header row; recognize and
        // drop it so an export→import round trip is clean.
        if record.fields.first().map(String::as_str) == Some(COLUMNS[0]) {
            continue;
        }
        match map_record(&record.fields) {
            Ok(fields) => records.push(fields),
            Err(reason) => skipped.push(SkippedLine { line: record.line, reason }),
        }
    }
    skipped.sort_by_key(|s| s.line);
    ImportOutcome { records, skipped }
}

/// Parse and insert, appending in pasted order. Imported rows keep their
/// text verbatim (no reference re-defaulting); a non-empty notice text
/// counts as user-authored so later type changes do not clobber it.
pub fn import_into(store: &mut EntryStore, text: &str) -> ImportOutcome {
    let outcome = parse_paste(text);
    for fields in &outcome.records {
        let mark_edited = !fields.notice_text.is_empty();
        let id = store.add_entry(fields.clone());
        if mark_edited {
            let _ = store.update_entry(id, |e| e.notice_text_edited = true);
        }
    }
    outcome
}

// -----------------------------------------------------------------------------
// Scanner
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InQuotes,
}

struct RawRecord {
    /// 1-based line where the record starts.
    line: usize,
    fields: Vec<String>,
}

/// Tab wins over comma when it appears unquoted in the first record;
/// spreadsheet clipboards paste TSV while our own export is CSV.
fn detect_delimiter(text: &str) -> char {
    let mut state = ScanState::Normal;
    for c in text.chars() {
        match state {
            ScanState::Normal => match c {
                '"' => state = ScanState::InQuotes,
                '\t' => return '\t',
                '\n' => return ',',
                _ => {}
            },
            ScanState::InQuotes => {
                if c == '"' {
                    state = ScanState::Normal;
                }
            }
        }
    }
    ','
}

/// Scan the full text, recovering after unterminated quotes: the
/// physical line where the malformed record started is reported as
/// skipped, and scanning resumes on the following line so later valid
/// rows still import.
fn scan_records(text: &str, delimiter: char) -> (Vec<RawRecord>, Vec<SkippedLine>) {
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    let mut rest = text;
    let mut base_line = 1usize;
    loop {
        match scan_chunk(rest, delimiter, base_line, &mut records) {
            ChunkEnd::Complete => break,
            ChunkEnd::Unterminated { record_line } => {
                skipped.push(SkippedLine {
                    line: record_line,
                    reason: "unterminated quote".into(),
                });
                // Resume after the line that opened the runaway quote.
                let newlines_to_skip = record_line - base_line + 1;
                let mut seen = 0usize;
                let mut resume_at = None;
                for (i, b) in rest.bytes().enumerate() {
                    if b == b'\n' {
                        seen += 1;
                        if seen == newlines_to_skip {
                            resume_at = Some(i + 1);
                            break;
                        }
                    }
                }
                match resume_at {
                    Some(offset) => {
                        rest = &rest[offset..];
                        base_line = record_line + 1;
                    }
                    // The malformed record started on the final line.
                    None => break,
                }
            }
        }
    }

    (records, skipped)
}

enum ChunkEnd {
    Complete,
    /// EOF hit inside a quoted field; carries the 1-based line where the
    /// offending record started.
    Unterminated { record_line: usize },
}

fn scan_chunk(
    text: &str,
    delimiter: char,
    first_line: usize,
    records: &mut Vec<RawRecord>,
) -> ChunkEnd {
    let mut state = ScanState::Normal;
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut field_quoted = false;
    let mut line = first_line;
    let mut record_line = first_line;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            ScanState::Normal => {
                if c == delimiter {
                    fields.push(std::mem::take(&mut field));
                    field_quoted = false;
                } else {
                    match c {
                        '"' if field.is_empty() && !field_quoted => {
                            state = ScanState::InQuotes;
                            field_quoted = true;
                        }
                        '\r' => {} // paired with the \n that follows
                        '\n' => {
                            line += 1;
                            fields.push(std::mem::take(&mut field));
                            field_quoted = false;
                            push_record(records, &mut fields, record_line);
                            record_line = line;
                        }
                        _ => field.push(c),
                    }
                }
            }
            ScanState::InQuotes => match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        state = ScanState::Normal;
                    }
                }
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                _ => field.push(c),
            },
        }
    }

    if state == ScanState::InQuotes {
        return ChunkEnd::Unterminated { record_line };
    }
    if !field.is_empty() || field_quoted || !fields.is_empty() {
        fields.push(field);
        push_record(records, &mut fields, record_line);
    }
    ChunkEnd::Complete
}

fn push_record(records: &mut Vec<RawRecord>, fields: &mut Vec<String>, line: usize) {
    let fields = std::mem::take(fields);
    // Blank lines between pasted blocks carry no data; drop them quietly.
    if fields.iter().all(String::is_empty) {
        return;
    }
    records.push(RawRecord { line, fields });
}

// -----------------------------------------------------------------------------
// Positional mapping
// -----------------------------------------------------------------------------

/// Map one record onto the fixed column order. A record with fewer
/// fields than columns is accepted with the tail treated as empty.
fn map_record(fields: &[String]) -> Result<EntryFields, String> {
    let get = |i: usize| fields.get(i).map(String::as_str).unwrap_or("");

    let start_date = parse_date(get(4), "start date")?;
    let end_date = parse_date(get(5), "end date")?;

    let display_duration_secs = match get(8).trim() {
        "" => DEFAULT_DISPLAY_SECS,
        s => s
            .parse::<u32>()
            .map_err(|_| format!("invalid display duration: {s}"))?,
    };

    let poster_type = match get(9).trim() {
        "" => PosterType::default(),
        s => PosterType::parse(s).ok_or_else(|| format!("unknown poster type: {s}"))?,
    };

    let poster_position = match get(10).trim() {
        "" => PosterPosition::default(),
        s => s
            .parse::<u8>()
            .ok()
            .and_then(PosterPosition::from_code)
            .ok_or_else(|| format!("unknown poster position: {s}"))?,
    };

    let show_on_board = match get(11).trim() {
        "" => true,
        "true" => true,
        "false" => false,
        s => return Err(format!("invalid show-on-board flag: {s}")),
    };

    Ok(EntryFields {
        property_code: get(0).to_string(),
        terminal_id: get(1).to_string(),
        vendor_id: get(2).to_string(),
        inspection_type_id: get(3).to_string(),
        emergency_contact: String::new(),
        notice_text: get(7).to_string(),
        remarks: get(6).to_string(),
        start_date,
        end_date,
        display_duration_secs,
        poster_type,
        poster_position,
        show_on_board,
    })
}

fn parse_date(s: &str, label: &str) -> Result<Option<NaiveDate>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("invalid {label}: {s}"))
}
