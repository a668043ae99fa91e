//! BoxMessageRepository -- object-safe dynamic dispatch wrapper for MessageRepository.
//!
//! Same blanket-impl pattern as `BoxGenerationProvider`:
//! 1. Define an object-safe `MessageRepositoryDyn` trait with boxed futures
//! 2. Blanket-impl `MessageRepositoryDyn` for all `T: MessageRepository`
//! 3. `BoxMessageRepository` wraps `Arc<dyn MessageRepositoryDyn>` and delegates
//!
//! The backend (SQLite or REST row store) is chosen at startup from the
//! configured URL, so the server holds this type rather than a concrete one.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use pocketchat_types::error::RepositoryError;
use pocketchat_types::message::{Message, NewMessage};

use super::message::MessageRepository;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`MessageRepository`] with boxed futures.
pub trait MessageRepositoryDyn: Send + Sync {
    fn insert_boxed<'a>(
        &'a self,
        message: &'a NewMessage,
    ) -> BoxFuture<'a, Result<Message, RepositoryError>>;

    fn list_recent_boxed<'a>(
        &'a self,
        user_id: &'a str,
        limit: u32,
    ) -> BoxFuture<'a, Result<Vec<Message>, RepositoryError>>;
}

impl<T: MessageRepository> MessageRepositoryDyn for T {
    fn insert_boxed<'a>(
        &'a self,
        message: &'a NewMessage,
    ) -> BoxFuture<'a, Result<Message, RepositoryError>> {
        Box::pin(self.insert(message))
    }

    fn list_recent_boxed<'a>(
        &'a self,
        user_id: &'a str,
        limit: u32,
    ) -> BoxFuture<'a, Result<Vec<Message>, RepositoryError>> {
        Box::pin(self.list_recent(user_id, limit))
    }
}

/// Type-erased, cheaply cloneable message repository.
#[derive(Clone)]
pub struct BoxMessageRepository {
    inner: Arc<dyn MessageRepositoryDyn>,
    backend: &'static str,
}

impl BoxMessageRepository {
    /// Wrap a concrete repository. `backend` is a short label used in logs.
    pub fn new<T: MessageRepository + 'static>(repository: T, backend: &'static str) -> Self {
        Self {
            inner: Arc::new(repository),
            backend,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }
}

impl MessageRepository for BoxMessageRepository {
    async fn insert(&self, message: &NewMessage) -> Result<Message, RepositoryError> {
        self.inner.insert_boxed(message).await
    }

    async fn list_recent(&self, user_id: &str, limit: u32) -> Result<Vec<Message>, RepositoryError> {
        self.inner.list_recent_boxed(user_id, limit).await
    }
}
