//! Post-commit synchronization hook.
//!
//! After a link record commits locally, the peer API holding the other side
//! of the relation gets to acknowledge it. A refusal triggers the
//! compensating delete in the lifecycle workflow, so a hook failure must
//! carry enough context to report upstream.

use async_trait::async_trait;
use thiserror::Error;
use verzoeken_types::prelude::Relation;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("synchronization failed: {reason}")]
pub struct SyncError {
    pub reason: String,
}

impl SyncError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable error code for the exposition layer.
    pub fn code(&self) -> &'static str {
        "sync-failed"
    }
}

/// Peer acknowledgement of a committed relation. Implementations must be
/// idempotent: the workflow may invoke the hook again for a relation the
/// peer already knows about.
#[async_trait]
pub trait SyncHook: Send + Sync {
    async fn relation_created(&self, relation: &Relation) -> Result<(), SyncError>;
}

/// Hook for deployments without a peer to notify; always acknowledges.
pub struct NoopSyncHook;

#[async_trait]
impl SyncHook for NoopSyncHook {
    async fn relation_created(&self, _relation: &Relation) -> Result<(), SyncError> {
        Ok(())
    }
}
