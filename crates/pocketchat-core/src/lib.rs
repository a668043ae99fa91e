//! Procedure layer and port trait definitions for PocketChat.
//!
//! This crate defines the "ports" (repository, generation provider, identity
//! resolver) that the infrastructure layer implements, plus everything that
//! composes them: the per-request context factory, the authorization gate,
//! the procedure router, and the client invocation layer. It depends only on
//! `pocketchat-types` -- never on `pocketchat-infra` or any database/IO crate.

pub mod client;
pub mod context;
pub mod gate;
pub mod generation;
pub mod procedure;
pub mod repository;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
