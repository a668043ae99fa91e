//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (pocketchat-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod box_repository;
pub mod message;

pub use box_repository::BoxMessageRepository;
pub use message::MessageRepository;
