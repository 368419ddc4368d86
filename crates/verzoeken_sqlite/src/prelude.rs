//! Common use for consumers of this crate.

pub use crate::db::DbRead;
pub use crate::db::DbWrite;
pub use crate::db::PConn;
pub use crate::error::DatabaseError;
pub use crate::error::DatabaseResult;
pub use crate::schema::SCHEMA_VERZOEKEN;
