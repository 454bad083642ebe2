//! Service layer over the Verdict database.
//!
//! `VerdictService` wraps `VerdictDb`. All repo methods are implemented as
//! `impl VerdictService` blocks in `crate::repos`.

use std::time::Duration;

use crate::VerdictDb;
use crate::error::DatabaseError;

/// Entry point for every storage operation.
///
/// Mutations that must be atomic follow this protocol:
/// 1. Begin an immediate transaction (takes the connection gate)
/// 2. Validate references inside the transaction
/// 3. Execute SQL
/// 4. Read back the stored row
/// 5. Commit, or roll back on any error
pub struct VerdictService {
    db: VerdictDb,
}

impl VerdictService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = VerdictDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create a service with an explicit busy timeout for the database file.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local_with(
        db_path: &str,
        busy_timeout: Duration,
    ) -> Result<Self, DatabaseError> {
        let db = VerdictDb::open_local_with(db_path, busy_timeout).await?;
        Ok(Self { db })
    }

    /// Create from an existing `VerdictDb` (for testing).
    #[must_use]
    pub const fn from_db(db: VerdictDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &VerdictDb {
        &self.db
    }
}
