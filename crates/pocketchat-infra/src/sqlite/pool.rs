//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. `DatabasePool` keeps a
//! multi-connection reader pool for concurrent history reads and a
//! single-connection writer pool, so concurrent inserts are serialized by
//! the pool itself.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: Multi-connection pool (up to 8) for SELECT queries.
/// - `writer`: Single-connection pool for INSERTs.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open (creating if missing) the database and run migrations.
    ///
    /// `busy_timeout` bounds how long a statement waits on a locked database.
    pub async fn new(database_url: &str, busy_timeout: Duration) -> Result<Self, sqlx::Error> {
        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(busy_timeout)
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);
        let write_opts = base_opts;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(write_opts)
            .await?;

        // Schema must exist before the read-only connections open.
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(read_opts)
            .await?;

        Ok(Self { reader, writer })
    }
}

/// Directory holding local state: `POCKETCHAT_DATA_DIR`, else `~/.pocketchat`.
pub fn default_data_dir(data_dir_override: Option<String>) -> PathBuf {
    data_dir_override
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".pocketchat")))
        .unwrap_or_else(|| PathBuf::from(".pocketchat"))
}

/// `sqlite://{data_dir}/pocketchat.db?mode=rwc`
pub fn default_database_url(data_dir_override: Option<String>) -> String {
    let path = default_data_dir(data_dir_override).join("pocketchat.db");
    format!("sqlite://{}?mode=rwc", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open(name: &str) -> (tempfile::TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join(name).display());
        let pool = DatabasePool::new(&url, Duration::from_secs(5)).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn test_pool_creates_messages_table() {
        let (_dir, pool) = open("test.db").await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(&pool.reader)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(table_names, vec!["messages"]);
    }

    #[tokio::test]
    async fn test_pool_wal_mode() {
        let (_dir, pool) = open("test_wal.db").await;

        let result: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();

        assert_eq!(result.0.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_reader_is_read_only() {
        let (_dir, pool) = open("test_ro.db").await;

        let denied = sqlx::query("DELETE FROM messages")
            .execute(&pool.reader)
            .await;
        assert!(denied.is_err());
    }

    #[test]
    fn test_default_database_url() {
        let url = default_database_url(Some("/tmp/pc".to_string()));
        assert_eq!(url, "sqlite:///tmp/pc/pocketchat.db?mode=rwc");

        let fallback = default_database_url(None);
        assert!(fallback.starts_with("sqlite://"));
        assert!(fallback.ends_with("pocketchat.db?mode=rwc"));
    }
}
