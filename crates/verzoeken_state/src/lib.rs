//! State layer of the Verzoeken relation engine.
//!
//! [`mutations`] and [`query`] operate on a `rusqlite::Transaction`
//! obtained from `verzoeken_sqlite`; [`guard`] holds the validation
//! objects the lifecycle workflow runs in fixed order before writing.
//! Guards are a fast path producing typed errors; the unique indexes in
//! the schema are the actual correctness mechanism under concurrency.

pub mod guard;
pub mod mutations;
pub mod prelude;
pub mod query;

#[cfg(test)]
mod tests;
