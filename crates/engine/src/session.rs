//! Session state - one editing session from screen entry to submission.
//!
//! Owns the store, the catalog snapshot, the clipboard, the autosave
//! debouncer, and the in-flight submission flag. Initialized when the
//! screen is entered (catalogs fetched), cleared when a submission
//! succeeds. No ambient globals.

use std::time::{Duration, Instant};

use crate::catalog::Catalogs;
use crate::clipboard::Clipboard;
use crate::events::StoreEvent;
use crate::store::EntryStore;

/// Fixed autosave debounce window.
pub const AUTOSAVE_DELAY: Duration = Duration::from_secs(2);

/// Single deferred deadline, re-armed on each mutation within the
/// window. The host event loop polls `due` and then snapshots.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// (Re)start the window from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        self.deadline.map_or(false, |d| now >= d)
    }

    /// Consume a due deadline. Returns whether the timer actually fired.
    pub fn fire(&mut self, now: Instant) -> bool {
        if self.due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

/// Error type for session-level operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A submit was requested while one is already in flight.
    SubmissionPending,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::SubmissionPending => write!(f, "a submission is already in progress"),
        }
    }
}

impl std::error::Error for SessionError {}

pub struct Session {
    pub store: EntryStore,
    pub catalogs: Catalogs,
    pub clipboard: Clipboard,
    autosave: Debouncer,
    submission_pending: bool,
}

impl Session {
    /// Enter the screen with a freshly fetched catalog snapshot.
    pub fn start(catalogs: Catalogs) -> Self {
        Self {
            store: EntryStore::new(),
            catalogs,
            clipboard: Clipboard::new(),
            autosave: Debouncer::new(AUTOSAVE_DELAY),
            submission_pending: false,
        }
    }

    /// Drain store events after an operation; arms the autosave window
    /// when any row data changed. Returns the batch for the presentation
    /// layer to recompute derived views from.
    pub fn note_mutations(&mut self, now: Instant) -> Vec<StoreEvent> {
        let events = self.store.take_events();
        if events.iter().any(StoreEvent::affects_rows) {
            self.autosave.arm(now);
        }
        events
    }

    /// Whether the autosave window has elapsed; consuming it hands the
    /// caller the go-ahead to write the recovery snapshot.
    pub fn autosave_fired(&mut self, now: Instant) -> bool {
        self.autosave.fire(now)
    }

    pub fn autosave_armed(&self) -> bool {
        self.autosave.is_armed()
    }

    pub fn submission_pending(&self) -> bool {
        self.submission_pending
    }

    /// Mark a submission in flight. A second submit while one is pending
    /// is rejected, not queued.
    pub fn begin_submission(&mut self) -> Result<(), SessionError> {
        if self.submission_pending {
            return Err(SessionError::SubmissionPending);
        }
        self.submission_pending = true;
        Ok(())
    }

    /// Resolve the in-flight submission. Success clears the store and
    /// the autosave timer (the caller discards the snapshot file);
    /// failure leaves everything in place for retry.
    pub fn finish_submission(&mut self, success: bool) {
        self.submission_pending = false;
        if success {
            self.store.clear();
            self.store.take_events();
            self.autosave.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryFields;

    #[test]
    fn test_debouncer_rearms_within_window() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_secs(2));
        d.arm(t0);
        assert!(!d.due(t0 + Duration::from_secs(1)));
        // New mutation inside the window pushes the deadline out.
        d.arm(t0 + Duration::from_secs(1));
        assert!(!d.due(t0 + Duration::from_secs(2)));
        assert!(d.fire(t0 + Duration::from_secs(3)));
        assert!(!d.is_armed());
    }

    #[test]
    fn test_mutation_arms_autosave_but_selection_does_not() {
        let t0 = Instant::now();
        let mut session = Session::start(Catalogs::default());
        let id = session.store.add_entry(EntryFields::default());
        session.note_mutations(t0);
        assert!(session.autosave_armed());
        assert!(session.autosave_fired(t0 + AUTOSAVE_DELAY));

        session.store.toggle_select(id);
        session.note_mutations(t0);
        assert!(!session.autosave_armed(), "selection churn must not trigger autosave");
    }

    #[test]
    fn test_second_submit_rejected_while_pending() {
        let mut session = Session::start(Catalogs::default());
        session.begin_submission().unwrap();
        assert_eq!(session.begin_submission(), Err(SessionError::SubmissionPending));
        session.finish_submission(false);
        session.begin_submission().unwrap();
    }

    #[test]
    fn test_successful_submission_clears_store_and_timer() {
        let t0 = Instant::now();
        let mut session = Session::start(Catalogs::default());
        session.store.add_entry(EntryFields::default());
        session.note_mutations(t0);
        session.begin_submission().unwrap();
        session.finish_submission(true);
        assert!(session.store.is_empty());
        assert!(!session.autosave_armed());
    }

    #[test]
    fn test_failed_submission_leaves_store_for_retry() {
        let mut session = Session::start(Catalogs::default());
        session.store.add_entry(EntryFields::default());
        session.begin_submission().unwrap();
        session.finish_submission(false);
        assert_eq!(session.store.len(), 1);
    }
}
