//! # verdict-db
//!
//! libSQL storage for Verdict.
//!
//! Holds submissions, one evidence row per (submission, source), the derived
//! final decision per submission, and correction feedback. The
//! `decision_summary` view joins submissions with their decisions for export.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) with a single embedded
//! connection. Access goes through an async gate so a write transaction never
//! interleaves with statements issued by another task.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;

#[cfg(test)]
mod test_support;

use std::ops::Deref;
use std::time::Duration;

use error::DatabaseError;
use libsql::Builder;
use tokio::sync::{Mutex, MutexGuard};

/// Central database handle for all Verdict state operations.
///
/// Wraps a libSQL database, its connection, and the gate that serializes
/// units of work on that connection.
pub struct VerdictDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    gate: Mutex<()>,
}

/// Exclusive access to the connection for one unit of work.
pub struct DbGuard<'a> {
    conn: &'a libsql::Connection,
    _gate: MutexGuard<'a, ()>,
}

impl Deref for DbGuard<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        self.conn
    }
}

/// An open `BEGIN IMMEDIATE` transaction holding the gate.
///
/// Must be finished with [`Txn::commit`] or [`Txn::rollback`]. A dropped
/// transaction is rolled back the next time the gate is taken.
pub struct Txn<'a> {
    guard: DbGuard<'a>,
}

impl Deref for Txn<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl Txn<'_> {
    /// # Errors
    ///
    /// Returns `DatabaseError` if `COMMIT` fails; the transaction is then rolled back.
    pub async fn commit(self) -> Result<(), DatabaseError> {
        if let Err(e) = self.guard.execute("COMMIT", ()).await {
            let _ = self.guard.execute("ROLLBACK", ()).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if `ROLLBACK` fails.
    pub async fn rollback(self) -> Result<(), DatabaseError> {
        self.guard.execute("ROLLBACK", ()).await?;
        Ok(())
    }

    /// Commit if `result` is `Ok`, roll back otherwise, and pass `result` through.
    ///
    /// # Errors
    ///
    /// Returns the error carried by `result`, or the `COMMIT` failure.
    pub async fn finish<T>(self, result: Result<T, DatabaseError>) -> Result<T, DatabaseError> {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = self.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(e)
            }
        }
    }
}

impl VerdictDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open_local_with(path, Duration::from_secs(5)).await
    }

    /// Open a local database with an explicit busy timeout.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local_with(path: &str, busy_timeout: Duration) -> Result<Self, DatabaseError> {
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Other(e.into()))?;
                }
            }
        }

        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
        // PRAGMA busy_timeout returns a row, so it goes through query().
        conn.query(
            &format!("PRAGMA busy_timeout = {}", busy_timeout.as_millis()),
            (),
        )
        .await
        .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;

        let verdict_db = Self {
            db,
            conn,
            gate: Mutex::new(()),
        };
        verdict_db.run_migrations().await?;
        tracing::debug!(%path, "database opened");
        Ok(verdict_db)
    }

    /// Take the gate for a sequence of reads or autocommit writes.
    ///
    /// Rolls back a transaction left open by a dropped [`Txn`].
    pub async fn lock(&self) -> DbGuard<'_> {
        let guard = DbGuard {
            conn: &self.conn,
            _gate: self.gate.lock().await,
        };
        if !guard.is_autocommit() {
            tracing::warn!("rolling back abandoned transaction");
            if let Err(e) = guard.execute("ROLLBACK", ()).await {
                tracing::error!(error = %e, "rollback of abandoned transaction failed");
            }
        }
        guard
    }

    /// Take the gate and open a `BEGIN IMMEDIATE` transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write lock cannot be acquired.
    pub async fn transaction(&self) -> Result<Txn<'_>, DatabaseError> {
        let guard = self.lock().await;
        guard.execute("BEGIN IMMEDIATE", ()).await?;
        Ok(Txn { guard })
    }

    /// Access the underlying libSQL connection without taking the gate.
    ///
    /// Intended for schema inspection in tests; mutations belong in repos.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"sub-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let conn = self.lock().await;
        generate_id(&conn, prefix).await
    }
}

/// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
pub(crate) async fn generate_id(
    conn: &libsql::Connection,
    prefix: &str,
) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}
