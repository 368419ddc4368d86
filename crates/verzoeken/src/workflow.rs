//! The relation lifecycle workflow.
//!
//! Creating a link record walks a fixed sequence of phases:
//!
//! ```text
//!   Validating ──► Persisted ──► Synchronizing ──► Committed
//!       │                             │
//!       ▼                             ▼
//!    Rejected                    RolledBack
//! ```
//!
//! - **Validating**: shape rules, a uniqueness fast path, then remote
//!   reference validation. Nothing is written; a rejection here leaves no
//!   trace.
//! - **Persisted**: uniqueness pre-check and insert, both inside one
//!   `Immediate` write transaction. Two writers racing on the same
//!   composite key serialize here; the loser surfaces the same duplicate
//!   error it would have gotten from the pre-check.
//! - **Synchronizing**: the post-commit hook notifies the peer API. On
//!   refusal the record is compensated away with a physical delete and the
//!   candidate ends `RolledBack`, reported with the hook's own failure.
//!
//! The synchronize-and-compensate tail runs in a spawned task: once the
//! record is persisted, the caller abandoning the future must not be able
//! to abort the compensating delete.

use crate::remote::RemoteCheck;
use crate::sync::SyncHook;
use std::fmt;
use std::sync::Arc;
use tracing::*;
use uuid::Uuid;
use verzoeken_sqlite::db::DbWrite;
use verzoeken_sqlite::error::DatabaseError;
use verzoeken_state::prelude::*;
use verzoeken_types::prelude::*;

pub use error::*;

mod error;

/// Where a candidate is in its lifecycle. `Committed`, `Rejected` and
/// `RolledBack` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    Persisted,
    Synchronizing,
    Committed,
    Rejected,
    RolledBack,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Validating => "validating",
            Phase::Persisted => "persisted",
            Phase::Synchronizing => "synchronizing",
            Phase::Committed => "committed",
            Phase::Rejected => "rejected",
            Phase::RolledBack => "rolled_back",
        };
        f.write_str(name)
    }
}

/// Drives relation candidates through the lifecycle.
#[derive(Clone)]
pub struct RelationLifecycle {
    db: DbWrite,
    remote: Arc<dyn RemoteCheck>,
    sync: Arc<dyn SyncHook>,
}

impl RelationLifecycle {
    pub fn new(db: DbWrite, remote: Arc<dyn RemoteCheck>, sync: Arc<dyn SyncHook>) -> Self {
        Self { db, remote, sync }
    }

    /// Create a link record, or report why it cannot exist.
    ///
    /// On `Ok` the returned record is committed and acknowledged by the
    /// peer. On `Err` the record does not exist, with the single exception
    /// of [`WorkflowError::Compensation`].
    #[instrument(skip(self, candidate), fields(kind = %candidate.kind(), verzoek = %candidate.verzoek()))]
    pub async fn create_relation(&self, candidate: RelationCandidate) -> WorkflowResult<Relation> {
        debug!(phase = %Phase::Validating);
        check_relation_shape(&candidate)?;
        // Fast-path duplicate detection before paying for the remote
        // fetch. The check inside the write transaction below is the
        // authoritative one.
        {
            let candidate = candidate.clone();
            self.db
                .async_reader::<StateMutationError, _, _>(move |txn| {
                    UniquenessGuard {
                        candidate: &candidate,
                    }
                    .check(&txn)
                })
                .await?;
        }
        for (field, url, resource_kind) in candidate.remote_refs() {
            self.remote
                .validate(url, resource_kind)
                .await
                .map_err(|e| {
                    debug!(field, code = e.code(), "remote reference rejected");
                    e
                })?;
        }

        let kind = candidate.kind();
        let record = candidate.clone().into_record(Uuid::new_v4());
        let stored = record.clone();
        let persist: Result<(), StateMutationError> = self
            .db
            .async_commit(move |txn| {
                UniquenessGuard {
                    candidate: &candidate,
                }
                .check(txn)?;
                insert_relation(txn, &stored)
            })
            .await;
        if let Err(e) = persist {
            if e.is_unique_violation() {
                // Lost a race past the pre-check; same outcome as the
                // guard seeing the row.
                return Err(GuardError::DuplicateRelation {
                    kind,
                    fields: duplicate_fields(kind),
                }
                .into());
            }
            return Err(e.into());
        }
        debug!(phase = %Phase::Persisted, relation = %record.uuid());

        let db = self.db.clone();
        let sync = self.sync.clone();
        let outcome = tokio::spawn(async move {
            debug!(phase = %Phase::Synchronizing, relation = %record.uuid());
            match sync.relation_created(&record).await {
                Ok(()) => {
                    debug!(phase = %Phase::Committed, relation = %record.uuid());
                    Ok(record)
                }
                Err(sync_error) => {
                    let uuid = record.uuid();
                    let kind = record.kind();
                    let deleted: Result<bool, StateMutationError> = db
                        .async_commit(move |txn| delete_relation_physical(txn, kind, uuid))
                        .await;
                    match deleted {
                        Ok(_) => {
                            debug!(phase = %Phase::RolledBack, relation = %uuid, reason = %sync_error.reason);
                            Err(WorkflowError::Sync(sync_error))
                        }
                        Err(e) => {
                            error!(
                                relation = %uuid,
                                error = %e,
                                "compensating delete failed; relation left in place"
                            );
                            Err(WorkflowError::Compensation {
                                relation: uuid,
                                reason: e.to_string(),
                            })
                        }
                    }
                }
            }
        });
        outcome
            .await
            .map_err(|e| WorkflowError::Database(DatabaseError::Join(e.to_string())))?
    }
}

fn duplicate_fields(kind: RelationKind) -> Vec<&'static str> {
    match kind {
        RelationKind::InformatieObject => vec!["verzoek", "informatieobject"],
        RelationKind::ContactMoment => vec!["verzoek", "contactmoment"],
        RelationKind::Object => vec!["verzoek", "object"],
        RelationKind::Klant => vec!["verzoek", "klant"],
        // No composite uniqueness; only the uuid primary key can collide.
        RelationKind::Product => vec!["uuid"],
    }
}
