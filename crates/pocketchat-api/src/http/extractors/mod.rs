//! Request extractors for the RPC endpoint.

pub mod context;
pub mod query;
