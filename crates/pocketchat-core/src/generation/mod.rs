//! Generative-AI provider abstractions.
//!
//! - `GenerationProvider`: RPITIT trait for concrete provider implementations
//! - `BoxGenerationProvider`: object-safe wrapper for dynamic dispatch
//! - `GeneratedImage`: raw image payload plus the data-URL encoding step

pub mod box_provider;
pub mod provider;

pub use box_provider::BoxGenerationProvider;
pub use provider::{GeneratedImage, GenerationProvider};
