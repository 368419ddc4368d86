//! Helpers for unit tests

use crate::db::DbWrite;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a [`TestDb`] backed by a temp directory.
pub fn test_db() -> TestDb {
    let tmpdir = Arc::new(tempfile::tempdir().expect("Couldn't create temp directory"));
    TestDb {
        db: DbWrite::open(tmpdir.path()).expect("Couldn't create test database"),
        tmpdir,
    }
}

/// A test database in a temp directory. The directory lives as long as any
/// clone of this handle.
#[derive(Clone)]
pub struct TestDb {
    db: DbWrite,
    tmpdir: Arc<TempDir>,
}

impl TestDb {
    /// Accessor
    pub fn db(&self) -> DbWrite {
        self.db.clone()
    }

    /// Accessor
    pub fn tmpdir(&self) -> Arc<TempDir> {
        self.tmpdir.clone()
    }
}
