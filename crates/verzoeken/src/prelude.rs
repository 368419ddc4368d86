//! Common use for consumers of this crate.

pub use crate::config::ConfigError;
pub use crate::config::RemoteApiConfig;
pub use crate::config::VerzoekenConfig;
pub use crate::remote::AuthResolver;
pub use crate::remote::RemoteCheck;
pub use crate::remote::RemoteReferenceValidator;
pub use crate::remote::RemoteValidationError;
pub use crate::remote::SchemaRegistry;
pub use crate::store::VerzoekStore;
pub use crate::sync::NoopSyncHook;
pub use crate::sync::SyncError;
pub use crate::sync::SyncHook;
pub use crate::workflow::Phase;
pub use crate::workflow::RelationLifecycle;
pub use crate::workflow::WorkflowError;
pub use crate::workflow::WorkflowResult;
pub use verzoeken_types::prelude::*;
