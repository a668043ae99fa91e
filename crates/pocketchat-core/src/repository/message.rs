//! Message repository trait definition.
//!
//! The row store is the only mutual-exclusion point in the system: the core
//! never locks, it relies on the store to serialize concurrent inserts.

use pocketchat_types::error::RepositoryError;
use pocketchat_types::message::{Message, NewMessage};

/// Repository trait for chat message persistence.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait MessageRepository: Send + Sync {
    /// Insert a row and return it as stored, with the store-assigned `id`
    /// and `created_at`.
    fn insert(
        &self,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// The `limit` most recent messages owned by `user_id`, newest first.
    fn list_recent(
        &self,
        user_id: &str,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;
}

impl<T: MessageRepository> MessageRepository for std::sync::Arc<T> {
    async fn insert(&self, message: &NewMessage) -> Result<Message, RepositoryError> {
        (**self).insert(message).await
    }

    async fn list_recent(&self, user_id: &str, limit: u32) -> Result<Vec<Message>, RepositoryError> {
        (**self).list_recent(user_id, limit).await
    }
}
