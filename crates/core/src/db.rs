//! SQLite persistence.
//!
//! A single connection guarded by a mutex backs every repository. `rusqlite::Connection` is not
//! `Sync`, so the mutex provides the required synchronisation; operations are short
//! read-then-write sequences.
//!
//! # Schema Versioning
//!
//! The schema version is tracked with SQLite's `user_version` pragma. To change the schema, add
//! a file under `migrations/`, append it to [`MIGRATIONS`], and bump [`SCHEMA_VERSION`].

use crate::{TrackerError, TrackerResult};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

const MIGRATIONS: &[(i32, &str)] = &[(1, include_str!("../migrations/001_initial.sql"))];

/// Shared handle to the tracker database.
#[derive(Clone, Debug)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file at `path` and run pending migrations.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if:
    /// - the parent directory cannot be created,
    /// - the database cannot be opened or configured,
    /// - the on-disk schema is newer than this build supports,
    /// - a migration fails.
    pub fn open(path: &Path) -> TrackerResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(TrackerError::DatabaseDirCreation)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database (tests and tooling).
    pub fn open_in_memory() -> TrackerResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> TrackerResult<Self> {
        conn.execute_batch(
            "PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// The schema version recorded in the database.
    pub fn schema_version(&self) -> TrackerResult<i32> {
        self.with_conn(|conn| Ok(current_version(conn)?))
    }

    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> TrackerResult<T>,
    ) -> TrackerResult<T> {
        let conn = self.conn.lock().map_err(|_| TrackerError::LockPoisoned)?;
        f(&conn)
    }

    /// Run `f` inside a transaction. The transaction commits only if `f` succeeds.
    pub(crate) fn with_transaction<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> TrackerResult<T>,
    ) -> TrackerResult<T> {
        let mut conn = self.conn.lock().map_err(|_| TrackerError::LockPoisoned)?;
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

fn current_version(conn: &Connection) -> rusqlite::Result<i32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Run all migrations newer than the recorded `user_version`.
fn run_migrations(conn: &Connection) -> TrackerResult<()> {
    let current = current_version(conn)?;

    if current > SCHEMA_VERSION {
        return Err(TrackerError::SchemaTooNew {
            found: current,
            supported: SCHEMA_VERSION,
        });
    }

    for &(version, sql) in MIGRATIONS {
        if version <= current {
            continue;
        }
        tracing::info!("running database migration v{version}");
        conn.execute_batch(sql)
            .map_err(|e| TrackerError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        conn.pragma_update(None, "user_version", version)?;
    }

    Ok(())
}
