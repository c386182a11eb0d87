//! SQLite storage adapter.
//!
//! A [`Database`] wraps a single shared connection (a `SqlitePool` capped at
//! one connection), created once at startup and passed explicitly to every
//! store — there is no module-level global handle. All queries go through
//! sqlx with bound parameters, never string interpolation.
//!
//! Constraint violations are surfaced as structured errors: the helpers here
//! inspect the driver's [`ErrorKind`] instead of matching message text, so
//! duplicate-name and restrict-delete detection does not depend on SQLite's
//! error wording.

use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::StoreError;

/// Schema applied on connect. `IF NOT EXISTS` keeps reconnects idempotent.
///
/// Column types mirror the original deployment: timestamps are ISO-8601
/// strings, not native datetime values.
const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        data varchar(1000),
        keyname varchar(10) NOT NULL,
        created_at varchar(25) NOT NULL,
        updated_at varchar(25)
    );

    CREATE TABLE IF NOT EXISTS folders (
        uuid TEXT PRIMARY KEY,
        folder_name TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS projects (
        uuid TEXT PRIMARY KEY,
        folder_uuid TEXT NOT NULL REFERENCES folders(uuid),
        project_name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE(folder_uuid, project_name)
    );
";

/// Handle to the shared SQLite session.
///
/// Cheap to clone — clones share the same underlying connection.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database file at `path` and apply the schema.
    ///
    /// Foreign key enforcement is switched on here; without it SQLite would
    /// silently allow the cascade-free deletes the folder store relies on
    /// being rejected.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectionNotReady`] when the file cannot be
    /// opened, or [`StoreError::Persistence`] when the schema fails to apply.
    pub async fn connect(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        Self::open(options).await
    }

    /// Open a fresh in-memory database with the schema applied.
    ///
    /// Data lives only as long as the handle. Used by tests and useful for
    /// local experiments.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectionNotReady`] when the connection cannot
    /// be established.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true);

        Self::open(options).await
    }

    async fn open(options: SqliteConnectOptions) -> Result<Self, StoreError> {
        // One connection, held for the life of the process. min == max keeps
        // the pool from dropping it when idle, which would wipe an in-memory
        // database.
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionNotReady {
                reason: e.to_string(),
            })?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(StoreError::from)?;

        tracing::info!("database connection verified, schema applied");

        Ok(Self { pool })
    }

    /// The underlying pool, for running queries against.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Whether `err` is a uniqueness-constraint violation.
#[must_use]
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if matches!(db.kind(), ErrorKind::UniqueViolation))
}

/// Whether `err` is a foreign-key-constraint violation.
#[must_use]
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if matches!(db.kind(), ErrorKind::ForeignKeyViolation))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_is_applied_on_connect() {
        let db = Database::in_memory().await.unwrap();

        // All three tables should accept queries immediately.
        for table in ["data", "folders", "projects"] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(db.pool())
                .await
                .unwrap();
            assert_eq!(count, 0);
        }
    }

    #[tokio::test]
    async fn connect_is_idempotent_for_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lockbox.db");
        let path = path.to_str().unwrap();

        let first = Database::connect(path).await.unwrap();
        sqlx::query("INSERT INTO data (data, keyname, created_at) VALUES (?, ?, ?)")
            .bind("ciphertext")
            .bind("demo")
            .bind("2026-01-01T00:00:00.000Z")
            .execute(first.pool())
            .await
            .unwrap();

        let second = Database::connect(path).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM data")
            .fetch_one(second.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn constraint_classification_distinguishes_kinds() {
        let db = Database::in_memory().await.unwrap();

        sqlx::query(
            "INSERT INTO folders (uuid, folder_name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind("u1")
        .bind("alpha")
        .bind("now")
        .bind("now")
        .execute(db.pool())
        .await
        .unwrap();

        let dup = sqlx::query(
            "INSERT INTO folders (uuid, folder_name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind("u2")
        .bind("alpha")
        .bind("now")
        .bind("now")
        .execute(db.pool())
        .await
        .unwrap_err();
        assert!(is_unique_violation(&dup));
        assert!(!is_foreign_key_violation(&dup));

        let orphan = sqlx::query(
            "INSERT INTO projects (uuid, folder_uuid, project_name, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind("p1")
        .bind("no-such-folder")
        .bind("proj")
        .bind("now")
        .bind("now")
        .execute(db.pool())
        .await
        .unwrap_err();
        assert!(is_foreign_key_violation(&orphan));
        assert!(!is_unique_violation(&orphan));
    }
}
