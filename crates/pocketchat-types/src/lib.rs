//! Shared domain types for PocketChat.
//!
//! This crate contains the types shared by every layer: the persisted
//! `Message`, the caller `Identity`, procedure inputs with their validation
//! schemas, the error taxonomy, the RPC wire envelope, and process-wide
//! configuration.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror, validator.

pub mod config;
pub mod error;
pub mod identity;
pub mod message;
pub mod procedure;
pub mod rpc;
