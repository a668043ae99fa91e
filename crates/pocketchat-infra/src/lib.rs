//! Infrastructure layer for PocketChat.
//!
//! Implementations of the ports defined in `pocketchat-core`: SQLite and
//! hosted row-store message repositories, the Gemini generation provider,
//! and the HTTP procedure caller. Also owns configuration loading, since
//! that is where the process environment and filesystem are read.

pub mod config;
pub mod gemini;
pub mod persistence;
pub mod rest;
pub mod rpc_client;
pub mod sqlite;
