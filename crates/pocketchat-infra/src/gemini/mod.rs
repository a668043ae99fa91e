//! Google Gemini generation provider.
//!
//! Text goes through the `generateContent` endpoint of the text model, images
//! through the `predict` endpoint of the image model.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
