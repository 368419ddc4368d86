//! The Verzoeken relation consistency engine.
//!
//! Owns the creation protocol for link records pointing at resources in
//! other APIs: guard validation, remote reference validation, atomic
//! check-and-insert, and post-commit synchronization with a compensating
//! delete when the peer rejects the relation. See [`workflow`] for the
//! state machine and [`store`] for the entity-store facade.

pub mod config;
pub mod prelude;
pub mod remote;
pub mod store;
pub mod sync;
pub mod workflow;
