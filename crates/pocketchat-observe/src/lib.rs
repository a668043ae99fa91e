//! Observability setup for PocketChat binaries.

pub mod tracing_setup;
