//! Remote store API client.
//!
//! Blocking reqwest client (no async runtime required). Covers the three
//! call families the entry screen consumes: the one-shot reference
//! catalog fetch, the batched row creation on final submission, and
//! named-template CRUD. Everything else about the remote service
//! (approval workflow, notifications, auth roles) is opaque to us.

mod client;
mod submit;

pub use client::{Client, ClientError, RowFailure, SubmitReceipt};
pub use submit::{submit, SubmitError};
