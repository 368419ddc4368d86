//! All possible errors when working with the SQLite databases

#![allow(missing_docs)]

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("database directory does not exist and could not be created: {0}")]
    EnvironmentMissing(PathBuf),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Pool(#[from] r2d2::Error),

    #[error("blocking database task failed: {0}")]
    Join(String),
}

impl DatabaseError {
    /// Whether the underlying SQLite error is a unique-index violation.
    /// Racing writers hit this instead of the guard pre-check; callers map
    /// it back to the matching typed error. Foreign key violations are
    /// deliberately not covered, those are a different failure.
    pub fn is_unique_violation(&self) -> bool {
        const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;
        const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
        matches!(
            self,
            DatabaseError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == SQLITE_CONSTRAINT_PRIMARYKEY
        )
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
