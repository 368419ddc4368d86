//! Pooled read/write handles to the verzoeken database.
//!
//! Write transactions are opened `Immediate` so a uniqueness pre-check and
//! the subsequent insert execute under one lock acquisition; two writers
//! racing on the same composite key cannot both pass the check. Blocking
//! rusqlite work runs on the tokio blocking pool.

use crate::error::DatabaseError;
use crate::error::DatabaseResult;
use crate::schema::SCHEMA_VERZOEKEN;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Transaction;
use rusqlite::TransactionBehavior;
use std::ops::Deref;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// A pooled connection.
pub type PConn = r2d2::PooledConnection<SqliteConnectionManager>;

/// A read-only handle to the database. Only ever produces read
/// transactions.
#[derive(Clone)]
pub struct DbRead {
    pool: r2d2::Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl DbRead {
    /// The database file's path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Check out a connection from the pool.
    pub fn conn(&self) -> DatabaseResult<PConn> {
        Ok(self.pool.get()?)
    }

    /// Run a closure against a fresh read transaction on the blocking
    /// pool.
    pub async fn async_reader<E, R, F>(&self, f: F) -> Result<R, E>
    where
        E: From<DatabaseError> + Send + 'static,
        F: FnOnce(Transaction<'_>) -> Result<R, E> + Send + 'static,
        R: Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = this.conn().map_err(E::from)?;
            let txn = conn
                .transaction()
                .map_err(DatabaseError::from)
                .map_err(E::from)?;
            f(txn)
        })
        .await
        .map_err(|e| E::from(DatabaseError::Join(e.to_string())))?
    }
}

/// The writable handle to the database. Derefs to [`DbRead`].
#[derive(Clone, derive_more::From)]
pub struct DbWrite(DbRead);

impl Deref for DbWrite {
    type Target = DbRead;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DbWrite {
    /// Open (creating if needed) the database under the given directory
    /// and bring its schema up to date.
    pub fn open(path_prefix: &Path) -> DatabaseResult<DbWrite> {
        if !path_prefix.is_dir() {
            std::fs::create_dir_all(path_prefix)
                .map_err(|_e| DatabaseError::EnvironmentMissing(path_prefix.to_owned()))?;
        }
        let path = path_prefix.join("verzoeken.sqlite3");
        let manager = SqliteConnectionManager::file(&path).with_init(|conn| {
            conn.pragma_update(None, "journal_mode", "wal")?;
            conn.pragma_update(None, "synchronous", "normal")?;
            // Cascade delete of link rows hangs off this pragma.
            conn.pragma_update(None, "foreign_keys", true)?;
            conn.busy_timeout(SQLITE_BUSY_TIMEOUT)
        });
        let pool = r2d2::Pool::builder().build(manager)?;
        let db = DbWrite(DbRead { pool, path });
        let mut conn = db.conn()?;
        SCHEMA_VERZOEKEN.initialize(&mut conn)?;
        Ok(db)
    }

    /// Run a closure against a read-write transaction on the blocking
    /// pool, committing afterwards. The closure sees the transaction by
    /// mutable reference; commit only happens when it returns `Ok`.
    pub async fn async_commit<E, R, F>(&self, f: F) -> Result<R, E>
    where
        E: From<DatabaseError> + Send + 'static,
        F: FnOnce(&mut Transaction<'_>) -> Result<R, E> + Send + 'static,
        R: Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = this.conn().map_err(E::from)?;
            let mut txn = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(DatabaseError::from)
                .map_err(E::from)?;
            let result = f(&mut txn)?;
            txn.commit()
                .map_err(DatabaseError::from)
                .map_err(E::from)?;
            Ok(result)
        })
        .await
        .map_err(|e| E::from(DatabaseError::Join(e.to_string())))?
    }

    /// A read-only view of this database.
    pub fn as_read(&self) -> DbRead {
        self.0.clone()
    }
}
