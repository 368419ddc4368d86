//! Schema and migration definitions
//!
//! To create a new migration, add a new [`Migration`] to the `migrations`
//! vec of [`SCHEMA_VERZOEKEN`] and ship the forward script alongside the
//! resulting schema. The `user_version` pragma tracks how many migrations
//! a database file has already applied.

use crate::error::DatabaseResult;
use once_cell::sync::Lazy;
use rusqlite::Connection;

pub static SCHEMA_VERZOEKEN: Lazy<Schema> = Lazy::new(|| Schema {
    migrations: vec![Migration::initial(include_str!(
        "sql/verzoeken/schema/0.sql"
    ))],
});

pub struct Schema {
    migrations: Vec<Migration>,
}

impl Schema {
    /// Determine if any database migrations need to run, and run them if
    /// so. NB: migration indices are 0-based, `user_version` is 1-based.
    pub fn initialize(&self, conn: &mut Connection) -> DatabaseResult<()> {
        let user_version: u16 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        let migrations_applied = user_version as usize;
        let num_migrations = self.migrations.len();

        match migrations_applied.cmp(&num_migrations) {
            std::cmp::Ordering::Less => {
                let txn = conn.transaction()?;
                for migration in &self.migrations[migrations_applied..] {
                    txn.execute_batch(&migration.forward)?;
                }
                txn.pragma_update(None, "user_version", num_migrations as u16)?;
                txn.commit()?;
                tracing::debug!(
                    from = migrations_applied,
                    to = num_migrations,
                    "applied database migrations"
                );
            }
            std::cmp::Ordering::Equal => (),
            std::cmp::Ordering::Greater => {
                tracing::warn!(
                    user_version,
                    num_migrations,
                    "database file is ahead of this binary's schema"
                );
            }
        }
        Ok(())
    }
}

pub struct Migration {
    forward: String,
}

impl Migration {
    pub fn initial(forward: &str) -> Self {
        Self {
            forward: forward.into(),
        }
    }
}
