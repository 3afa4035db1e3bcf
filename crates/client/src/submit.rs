//! Final submission - one batched create of all complete rows.
//!
//! The session gates re-entrancy (a second submit while one is pending
//! is rejected, not queued). Success clears the store; the caller then
//! discards the local recovery snapshot. Failure of any kind leaves the
//! store untouched so the user can retry.

use signpost_engine::editor;
use signpost_engine::entry::Entry;
use signpost_engine::session::{Session, SessionError};

use crate::client::{Client, ClientError, SubmitReceipt};

#[derive(Debug)]
pub enum SubmitError {
    /// A submission is already in flight.
    Session(SessionError),
    /// Nothing to submit: no complete rows.
    NoCompleteRows,
    /// The remote call failed; the store is intact for retry.
    Remote(ClientError),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Session(e) => write!(f, "{}", e),
            SubmitError::NoCompleteRows => write!(f, "no complete rows to submit"),
            SubmitError::Remote(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Submit all complete rows in display order. On success the session's
/// store is cleared and the receipt returned; the caller is responsible
/// for discarding the recovery snapshot.
pub fn submit(client: &Client, session: &mut Session) -> Result<SubmitReceipt, SubmitError> {
    session.begin_submission().map_err(SubmitError::Session)?;

    let complete: Vec<&Entry> = session
        .store
        .entries()
        .iter()
        .filter(|e| editor::is_complete(&e.fields))
        .collect();
    if complete.is_empty() {
        session.finish_submission(false);
        return Err(SubmitError::NoCompleteRows);
    }

    match client.create_entries(&complete) {
        Ok(receipt) => {
            session.finish_submission(true);
            Ok(receipt)
        }
        Err(e) => {
            session.finish_submission(false);
            Err(SubmitError::Remote(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use signpost_engine::catalog::Catalogs;
    use signpost_engine::entry::EntryFields;

    fn complete_fields(code: &str) -> EntryFields {
        EntryFields {
            property_code: code.into(),
            vendor_id: "0".into(),
            inspection_type_id: "0".into(),
            ..EntryFields::default()
        }
    }

    #[test]
    fn test_submit_sends_only_complete_rows_and_clears_store() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/entry/batch");
            then.status(200).json_body(serde_json::json!({"created": ["r-1"]}));
        });

        let client = Client::new(server.base_url(), "tok").unwrap();
        let mut session = Session::start(Catalogs::default());
        session.store.add_entry(complete_fields("2010"));
        session.store.add_entry(EntryFields::default()); // incomplete, stays local

        let receipt = submit(&client, &mut session).unwrap();
        mock.assert();
        assert_eq!(receipt.created, vec!["r-1".to_string()]);
        assert!(session.store.is_empty(), "success clears the store");
        assert!(!session.submission_pending());
    }

    #[test]
    fn test_failed_submit_leaves_store_intact() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/entry/batch");
            then.status(500).body("down");
        });

        let client = Client::new(server.base_url(), "tok").unwrap();
        let mut session = Session::start(Catalogs::default());
        session.store.add_entry(complete_fields("2010"));

        match submit(&client, &mut session) {
            Err(SubmitError::Remote(ClientError::Http(500, _))) => {}
            other => panic!("expected remote failure, got {:?}", other.map(|_| ())),
        }
        assert_eq!(session.store.len(), 1, "failure must leave rows for retry");
        assert!(!session.submission_pending(), "pending flag released for retry");
    }

    #[test]
    fn test_submit_with_no_complete_rows_is_rejected_locally() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/entry/batch");
            then.status(200).json_body(serde_json::json!({"created": []}));
        });

        let client = Client::new(server.base_url(), "tok").unwrap();
        let mut session = Session::start(Catalogs::default());
        session.store.add_entry(EntryFields::default());

        assert!(matches!(
            submit(&client, &mut session),
            Err(SubmitError::NoCompleteRows)
        ));
        mock.assert_hits(0);
        assert_eq!(session.store.len(), 1);
    }
}
