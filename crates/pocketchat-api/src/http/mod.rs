//! HTTP layer for PocketChat.
//!
//! Axum-based RPC endpoint at `/api/rpc/{procedure}` with bearer-token
//! request contexts, envelope responses, and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
