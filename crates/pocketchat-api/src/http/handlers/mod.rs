//! HTTP request handlers for the RPC endpoint.

pub mod rpc;
