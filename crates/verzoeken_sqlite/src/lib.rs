//! Building blocks for persisted Verzoeken state.
//!
//! Exposes pooled read/write database handles over a single SQLite file.
//! The storage contract the rest of the workspace relies on: atomic
//! check-and-insert inside one write transaction, cascade delete of link
//! rows when their owning Verzoek row is removed, and a physical delete
//! usable for compensation.

pub mod db;
pub mod error;
pub mod prelude;
pub mod schema;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

// Re-export rusqlite so downstream crates use the exact same version.
pub use ::rusqlite;
