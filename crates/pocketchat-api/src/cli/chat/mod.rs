//! Terminal chat client.
//!
//! Provides the interactive loop (`pchat chat`) plus the one-shot `send`
//! and `history` commands. All of them drive a `ChatSession`, so they work
//! the same against an in-process procedure set or a remote server.

pub mod banner;
pub mod caller;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod oneshot;
pub mod renderer;
