use thiserror::Error;
use verzoeken_types::prelude::FieldError;
use verzoeken_types::prelude::UnknownValue;

#[derive(Error, Debug)]
pub enum StateQueryError {
    #[error(transparent)]
    Sql(#[from] verzoeken_sqlite::rusqlite::Error),

    #[error(transparent)]
    Database(#[from] verzoeken_sqlite::error::DatabaseError),

    #[error("stored field no longer parses: {0}")]
    Field(#[from] FieldError),

    #[error("stored enum value no longer parses: {0}")]
    UnknownValue(#[from] UnknownValue),

    #[error("stored uuid no longer parses: {0}")]
    Uuid(#[from] uuid::Error),

    #[error("stored timestamp no longer parses: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

pub type StateQueryResult<T> = Result<T, StateQueryError>;
