// Signpost CLI - headless batch operations on signage entry drafts.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use signpost_client::{submit, Client};
use signpost_engine::catalog::Catalogs;
use signpost_engine::editor;
use signpost_engine::session::Session;
use signpost_engine::store::EntryStore;
use signpost_io::{csv, native, paste, snapshot::Snapshot};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
/// Some pasted lines were skipped (import) or rows are incomplete (validate).
pub const EXIT_PARTIAL: u8 = 3;

#[derive(Parser)]
#[command(name = "spost")]
#[command(about = "Bulk signage-announcement entry (headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse spreadsheet-paste text into the draft file
    Import {
        /// Text file holding the pasted rows
        input: PathBuf,
        /// Draft file to append to (created if missing)
        #[arg(long, short = 'd', default_value = "drafts.json")]
        drafts: PathBuf,
    },
    /// Export complete draft rows as signage-network CSV
    Export {
        #[arg(long, short = 'd', default_value = "drafts.json")]
        drafts: PathBuf,
        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Report per-row validation problems
    Validate {
        #[arg(long, short = 'd', default_value = "drafts.json")]
        drafts: PathBuf,
    },
    /// Submit all complete rows as one batch
    Submit {
        #[arg(long, short = 'd', default_value = "drafts.json")]
        drafts: PathBuf,
        #[arg(long, env = "SIGNPOST_API_BASE")]
        api_base: String,
        #[arg(long, env = "SIGNPOST_TOKEN")]
        token: String,
    },
    /// Fetch the reference catalogs and print their sizes
    Catalogs {
        #[arg(long, env = "SIGNPOST_API_BASE")]
        api_base: String,
        #[arg(long, env = "SIGNPOST_TOKEN")]
        token: String,
    },
    /// Inspect, accept, or discard the local recovery snapshot
    Recover {
        /// Restore the snapshot into this draft file
        #[arg(long)]
        into: Option<PathBuf>,
        /// Delete the snapshot without restoring
        #[arg(long)]
        discard: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Import { input, drafts } => cmd_import(&input, &drafts),
        Commands::Export { drafts, output } => cmd_export(&drafts, output.as_deref()),
        Commands::Validate { drafts } => cmd_validate(&drafts),
        Commands::Submit { drafts, api_base, token } => cmd_submit(&drafts, &api_base, &token),
        Commands::Catalogs { api_base, token } => cmd_catalogs(&api_base, &token),
        Commands::Recover { into, discard } => cmd_recover(into.as_deref(), discard),
    };
    ExitCode::from(code)
}

/// Load the draft file into a store; a missing file is an empty batch.
fn load_store(drafts: &std::path::Path) -> Result<EntryStore, String> {
    let mut store = EntryStore::new();
    if drafts.exists() {
        store.restore(native::load_drafts(drafts)?);
    }
    Ok(store)
}

fn cmd_import(input: &std::path::Path, drafts: &std::path::Path) -> u8 {
    let text = match std::fs::read_to_string(input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: cannot read {}: {}", input.display(), e);
            return EXIT_ERROR;
        }
    };
    let mut store = match load_store(drafts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };
    let outcome = paste::import_into(&mut store, &text);
    for skip in &outcome.skipped {
        eprintln!("line {}: skipped ({})", skip.line, skip.reason);
    }
    if let Err(e) = native::save_drafts(drafts, store.entries()) {
        eprintln!("error: cannot write {}: {}", drafts.display(), e);
        return EXIT_ERROR;
    }
    println!("{}", outcome.summary());
    if outcome.skipped.is_empty() {
        EXIT_SUCCESS
    } else {
        EXIT_PARTIAL
    }
}

fn cmd_export(drafts: &std::path::Path, output: Option<&std::path::Path>) -> u8 {
    let store = match load_store(drafts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };
    let text = match csv::export_string(&store) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };
    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, text) {
                eprintln!("error: cannot write {}: {}", path.display(), e);
                return EXIT_ERROR;
            }
        }
        None => print!("{}", text),
    }
    EXIT_SUCCESS
}

fn cmd_validate(drafts: &std::path::Path) -> u8 {
    let store = match load_store(drafts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };
    let mut incomplete = 0usize;
    for (index, entry) in store.entries().iter().enumerate() {
        let report = editor::validate(&entry.fields);
        if !report.is_complete() {
            incomplete += 1;
        }
        for problem in &report.problems {
            println!("row {} (id {}): {}", index + 1, entry.id, problem);
        }
    }
    let stats = signpost_engine::bulk::stats(&store);
    println!(
        "{} rows: {} complete, {} incomplete",
        stats.total, stats.complete, stats.incomplete
    );
    if incomplete > 0 {
        EXIT_PARTIAL
    } else {
        EXIT_SUCCESS
    }
}

fn cmd_submit(drafts: &std::path::Path, api_base: &str, token: &str) -> u8 {
    let store = match load_store(drafts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };
    let client = match Client::new(api_base, token) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };
    let mut session = Session::start(Catalogs::default());
    session.store = store;
    match submit(&client, &mut session) {
        Ok(receipt) => {
            println!("submitted {} row(s)", receipt.created.len());
            // The batch is accepted; the drafts and the recovery snapshot
            // are finished with.
            if let Err(e) = std::fs::remove_file(drafts) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    eprintln!("warning: could not remove {}: {}", drafts.display(), e);
                }
            }
            Snapshot::discard();
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_ERROR
        }
    }
}

fn cmd_catalogs(api_base: &str, token: &str) -> u8 {
    let client = match Client::new(api_base, token) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };
    match client.fetch_catalogs() {
        Ok(catalogs) => {
            println!("properties:       {}", catalogs.properties.len());
            println!("vendors:          {}", catalogs.vendors.len());
            println!("inspection types: {}", catalogs.inspection_types.len());
            println!("categories:       {}", catalogs.categories.len());
            println!("template images:  {}", catalogs.template_images.len());
            EXIT_SUCCESS
        }
        Err(e) => {
            // Without the catalogs nothing can be defaulted; this is fatal.
            eprintln!("error: {}", e);
            EXIT_ERROR
        }
    }
}

fn cmd_recover(into: Option<&std::path::Path>, discard: bool) -> u8 {
    if discard {
        Snapshot::discard();
        println!("recovery snapshot discarded");
        return EXIT_SUCCESS;
    }
    let Some(snapshot) = Snapshot::load() else {
        println!("no recovery snapshot");
        return EXIT_SUCCESS;
    };
    match into {
        Some(path) => {
            let rows = snapshot.entries.len();
            if let Err(e) = native::save_drafts(path, &snapshot.entries) {
                eprintln!("error: cannot write {}: {}", path.display(), e);
                return EXIT_ERROR;
            }
            Snapshot::discard();
            println!("restored {} row(s) into {}", rows, path.display());
            EXIT_SUCCESS
        }
        None => {
            println!(
                "snapshot from {}: {} row(s); use --into FILE to restore or --discard to drop",
                snapshot.saved_at, snapshot.entries.len()
            );
            EXIT_SUCCESS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_import_then_export_roundtrip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("paste.txt");
        let drafts = dir.path().join("drafts.json");
        let out = dir.path().join("out.csv");
        std::fs::write(&input, "2010,h0001A00,0,0,2025-02-01,2025-02-01\n").unwrap();

        assert_eq!(cmd_import(&input, &drafts), EXIT_SUCCESS);
        assert_eq!(cmd_export(&drafts, Some(&out)), EXIT_SUCCESS);

        let text = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2, "header plus one data line");
        assert!(lines[1].starts_with("2010,h0001A00,"));
    }

    #[test]
    fn test_import_partial_exit_on_skipped_lines() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("paste.txt");
        let drafts = dir.path().join("drafts.json");
        // Second line carries a date the importer must refuse.
        std::fs::write(&input, "2010,t1,0,0,2025-02-01\n120406,t2,1,1,02/15/2025\n").unwrap();

        assert_eq!(cmd_import(&input, &drafts), EXIT_PARTIAL);
        let kept = native::load_drafts(&drafts).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].fields.property_code, "2010");
    }

    #[test]
    fn test_import_appends_to_existing_drafts() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("paste.txt");
        let drafts = dir.path().join("drafts.json");
        std::fs::write(&input, "2010,t1,0,0\n").unwrap();
        assert_eq!(cmd_import(&input, &drafts), EXIT_SUCCESS);
        std::fs::write(&input, "120406,t2,1,1\n").unwrap();
        assert_eq!(cmd_import(&input, &drafts), EXIT_SUCCESS);

        let kept = native::load_drafts(&drafts).unwrap();
        assert_eq!(kept.len(), 2);
        let ids: std::collections::HashSet<_> = kept.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 2, "appended rows keep unique ids");
    }

    #[test]
    fn test_validate_partial_exit_on_incomplete_rows() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("paste.txt");
        let drafts = dir.path().join("drafts.json");
        // Vendor column missing entirely.
        std::fs::write(&input, "2010,t1\n").unwrap();
        assert_eq!(cmd_import(&input, &drafts), EXIT_SUCCESS);
        assert_eq!(cmd_validate(&drafts), EXIT_PARTIAL);
    }

    #[test]
    fn test_export_of_missing_drafts_is_empty_batch() {
        let dir = tempdir().unwrap();
        let drafts = dir.path().join("absent.json");
        let out = dir.path().join("out.csv");
        assert_eq!(cmd_export(&drafts, Some(&out)), EXIT_SUCCESS);
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 1, "header only");
    }
}
