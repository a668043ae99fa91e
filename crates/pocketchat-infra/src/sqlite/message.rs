//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `pocketchat-core` using sqlx with split
//! read/write pools: raw queries, a private row struct, inserts on the
//! writer, history reads on the reader.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use pocketchat_core::repository::MessageRepository;
use pocketchat_types::error::RepositoryError;
use pocketchat_types::message::{Message, NewMessage};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MessageRow {
    id: String,
    user_id: String,
    content: Option<String>,
    image_url: Option<String>,
    is_user_message: i64,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            content: row.try_get("content")?,
            image_url: row.try_get("image_url")?,
            is_user_message: row.try_get("is_user_message")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        Ok(Message {
            id: self.id,
            user_id: self.user_id,
            content: self.content,
            image_url: self.image_url,
            is_user_message: self.is_user_message != 0,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC timestamps so that text ordering matches time ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ---------------------------------------------------------------------------
// MessageRepository implementation
// ---------------------------------------------------------------------------

impl MessageRepository for SqliteMessageRepository {
    async fn insert(&self, message: &NewMessage) -> Result<Message, RepositoryError> {
        let stored = Message {
            id: Uuid::now_v7().to_string(),
            user_id: message.user_id.clone(),
            content: message.content.clone(),
            image_url: message.image_url.clone(),
            is_user_message: message.is_user_message,
            // Stored at microsecond precision; truncate so the returned row
            // matches what a later read yields.
            created_at: Utc::now().trunc_subsecs(6),
        };

        sqlx::query(
            r#"INSERT INTO messages (id, user_id, content, image_url, is_user_message, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&stored.id)
        .bind(&stored.user_id)
        .bind(&stored.content)
        .bind(&stored.image_url)
        .bind(stored.is_user_message as i64)
        .bind(format_datetime(&stored.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(stored)
    }

    async fn list_recent(&self, user_id: &str, limit: u32) -> Result<Vec<Message>, RepositoryError> {
        // v7 ids break created_at ties in insertion order.
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Decode(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }
}
