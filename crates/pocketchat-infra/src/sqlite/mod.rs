//! SQLite storage layer.
//!
//! Message history backed by SQLite with WAL mode and split read/write
//! connection pools.

pub mod message;
pub mod pool;

pub use message::SqliteMessageRepository;
pub use pool::DatabasePool;
