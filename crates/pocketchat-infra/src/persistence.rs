//! Repository factory.
//!
//! Picks the message store from the configured database URL:
//! `sqlite:` opens a local database, `http(s)://` talks to a hosted row
//! store. Both come back as a [`BoxMessageRepository`].

use std::time::Duration;

use secrecy::SecretString;
use tracing::info;

use pocketchat_core::repository::BoxMessageRepository;
use pocketchat_types::config::PersistenceConfig;
use pocketchat_types::error::RepositoryError;

use crate::rest::RestMessageRepository;
use crate::sqlite::{DatabasePool, SqliteMessageRepository};

/// Build the repository described by `config`.
pub async fn create_repository(
    config: &PersistenceConfig,
) -> Result<BoxMessageRepository, RepositoryError> {
    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| RepositoryError::Connection("no database URL configured".to_string()))?;
    let timeout = Duration::from_secs(config.request_timeout_secs);

    if url.starts_with("http://") || url.starts_with("https://") {
        let key = config.anon_key.clone().ok_or_else(|| {
            RepositoryError::Connection("row store requires an anon key".to_string())
        })?;
        let repo = RestMessageRepository::new(url, SecretString::from(key), timeout)?;
        info!("Using hosted row store");
        return Ok(BoxMessageRepository::new(repo, "rest"));
    }

    if url.starts_with("sqlite:") {
        ensure_parent_dir(url).await?;
        let pool = DatabasePool::new(url, timeout)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        info!("Using SQLite message store");
        return Ok(BoxMessageRepository::new(
            SqliteMessageRepository::new(pool),
            "sqlite",
        ));
    }

    Err(RepositoryError::Connection(format!(
        "unsupported database URL scheme: {url}"
    )))
}

/// SQLite creates the file but not its directory.
async fn ensure_parent_dir(url: &str) -> Result<(), RepositoryError> {
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();
    if path.is_empty() || path.starts_with(':') {
        return Ok(());
    }
    match std::path::Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| RepositoryError::Connection(format!("cannot create {}: {e}", parent.display()))),
        _ => Ok(()),
    }
}
