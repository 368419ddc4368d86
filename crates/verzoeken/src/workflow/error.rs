use crate::remote::RemoteValidationError;
use crate::sync::SyncError;
use crate::workflow::Phase;
use thiserror::Error;
use uuid::Uuid;
use verzoeken_sqlite::error::DatabaseError;
use verzoeken_state::prelude::GuardError;
use verzoeken_state::prelude::StateMutationError;
use verzoeken_state::prelude::StateQueryError;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error(transparent)]
    Remote(#[from] RemoteValidationError),

    #[error(transparent)]
    Sync(SyncError),

    /// Synchronization failed AND the compensating delete failed, leaving
    /// the relation in place. Operator attention required.
    #[error("compensating delete of relation {relation} failed: {reason}")]
    Compensation { relation: Uuid, reason: String },

    #[error("verzoek {0} does not exist")]
    VerzoekMissing(Uuid),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Query(#[from] StateQueryError),
}

// Flattened by hand so guard rejections keep their own variant instead of
// hiding inside the mutation error.
impl From<StateMutationError> for WorkflowError {
    fn from(e: StateMutationError) -> Self {
        match e {
            StateMutationError::Guard(guard) => WorkflowError::Guard(guard),
            StateMutationError::VerzoekMissing(uuid) => WorkflowError::VerzoekMissing(uuid),
            StateMutationError::Database(db) => WorkflowError::Database(db),
            StateMutationError::Query(query) => WorkflowError::Query(query),
            StateMutationError::Sql(sql) => WorkflowError::Database(DatabaseError::from(sql)),
        }
    }
}

impl WorkflowError {
    /// Stable machine-readable error code for the exposition layer.
    pub fn code(&self) -> &'static str {
        match self {
            WorkflowError::Guard(e) => e.code(),
            WorkflowError::Remote(e) => e.code(),
            WorkflowError::Sync(e) => e.code(),
            WorkflowError::VerzoekMissing(_) => "does_not_exist",
            WorkflowError::Compensation { .. }
            | WorkflowError::Database(_)
            | WorkflowError::Query(_) => "internal",
        }
    }

    /// The lifecycle phase a rejected candidate ends in, when the outcome
    /// is well-defined. Infrastructure failures have none.
    pub fn terminal_phase(&self) -> Option<Phase> {
        match self {
            WorkflowError::Guard(_)
            | WorkflowError::Remote(_)
            | WorkflowError::VerzoekMissing(_) => Some(Phase::Rejected),
            WorkflowError::Sync(_) => Some(Phase::RolledBack),
            WorkflowError::Compensation { .. }
            | WorkflowError::Database(_)
            | WorkflowError::Query(_) => None,
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
