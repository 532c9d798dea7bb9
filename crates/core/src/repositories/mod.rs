//! Repository services over the SQLite store.
//!
//! Each service wraps a [`Database`](crate::db::Database) handle and exposes record-level
//! operations. Functions taking a `&Connection` are the building blocks the review workflow
//! composes inside a single transaction.

pub mod error_reports;
pub mod listing;
pub mod patients;
pub mod reports;
pub mod staff;

mod rows;
