use crate::guard::GuardError;
use crate::query::StateQueryError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StateMutationError {
    #[error(transparent)]
    Sql(#[from] verzoeken_sqlite::rusqlite::Error),

    #[error(transparent)]
    Database(#[from] verzoeken_sqlite::error::DatabaseError),

    #[error(transparent)]
    Query(#[from] StateQueryError),

    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error("verzoek {0} does not exist")]
    VerzoekMissing(Uuid),
}

impl StateMutationError {
    /// Did SQLite's own unique-index enforcement fire? Happens when two
    /// writers race past the guard pre-check; callers translate this into
    /// the corresponding guard error.
    pub fn is_unique_violation(&self) -> bool {
        const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;
        const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
        match self {
            StateMutationError::Sql(verzoeken_sqlite::rusqlite::Error::SqliteFailure(e, _)) => {
                e.extended_code == SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == SQLITE_CONSTRAINT_PRIMARYKEY
            }
            StateMutationError::Database(e) => e.is_unique_violation(),
            _ => false,
        }
    }
}

pub type StateMutationResult<T> = Result<T, StateMutationError>;
