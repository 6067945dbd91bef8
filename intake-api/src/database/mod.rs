pub mod candidates;
pub mod details;
pub mod migrations;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Record store errors. Constraint failures are kept apart from other
/// SQLite errors so callers can tell a duplicate candidate from a broken
/// database.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Candidate not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            rusqlite::Error::SqliteFailure(err, msg)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::ConstraintViolation(msg.unwrap_or_else(|| err.to_string()))
            }
            other => StoreError::Database(other),
        }
    }
}

/// Shared handle to the SQLite connection pool. Every store operation takes
/// one by value and checks out its own connection.
#[derive(Clone)]
pub struct DbPool {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl DbPool {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn lock(&self) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
        Ok(self.pool.get()?)
    }
}

pub struct Database {
    pub pool: DbPool,
    pub path: PathBuf,
}

impl Database {
    /// Open the database file, bring the schema up to date and build the
    /// connection pool. With `reset` every table is dropped and recreated
    /// first.
    pub fn new(db_path: &Path, pool_size: u32, reset: bool) -> anyhow::Result<Self> {
        // Ensure directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Run migrations on a plain connection before the pool opens
        {
            let conn = Connection::open(db_path)?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            if reset {
                tracing::warn!("Resetting candidate schema at {}", db_path.display());
                migrations::reset_schema(&conn)?;
            } else {
                migrations::run_migrations(&conn)?;
            }
        }

        let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder().max_size(pool_size.max(1)).build(manager)?;

        Ok(Database {
            pool: DbPool::new(pool),
            path: db_path.to_path_buf(),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Database;
    use tempfile::TempDir;

    /// Fresh database in a temporary directory; keep the `TempDir` alive for
    /// the duration of the test.
    pub fn temp_database() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("candidate_data.db"), 4, false).unwrap();
        (dir, db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pool_connections_enforce_foreign_keys() {
        let (_dir, db) = test_support::temp_database();
        let conn = db.pool.lock().await.unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_reopen_keeps_rows_unless_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("candidate_data.db");

        {
            let _db = Database::new(&path, 2, false).unwrap();
            let conn = Connection::open(&path).unwrap();
            conn.execute("INSERT INTO Candidate (first_name) VALUES ('ASHA')", [])
                .unwrap();
        }

        let count = |path: &Path| -> i64 {
            Connection::open(path)
                .unwrap()
                .query_row("SELECT COUNT(*) FROM Candidate", [], |row| row.get(0))
                .unwrap()
        };

        let _db = Database::new(&path, 2, false).unwrap();
        assert_eq!(count(&path), 1);

        let _db = Database::new(&path, 2, true).unwrap();
        assert_eq!(count(&path), 0);
    }

    #[test]
    fn test_constraint_errors_are_classified() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE t (v TEXT UNIQUE)", []).unwrap();
        conn.execute("INSERT INTO t (v) VALUES ('x')", []).unwrap();
        let err: StoreError = conn
            .execute("INSERT INTO t (v) VALUES ('x')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));

        let err: StoreError = conn
            .query_row("SELECT v FROM t WHERE v = 'y'", [], |row| row.get::<_, String>(0))
            .unwrap_err()
            .into();
        assert!(matches!(err, StoreError::NotFound));
    }
}
