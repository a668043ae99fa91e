//! GenerationProvider trait definition.
//!
//! Text and image generation are separate methods because the upstream
//! endpoints take different request bodies and return different shapes.

use pocketchat_types::error::GenerationError;

/// Default MIME type when the provider does not report one.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// A generated image as returned by the provider: base64 payload plus MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub base64_data: String,
    pub mime_type: String,
}

impl GeneratedImage {
    pub fn new(base64_data: impl Into<String>, mime_type: Option<String>) -> Self {
        Self {
            base64_data: base64_data.into(),
            mime_type: mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string()),
        }
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

/// Trait for generative-AI backends.
///
/// Implementations live in pocketchat-infra (e.g., `GeminiProvider`).
pub trait GenerationProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Generate text for a prompt. Returns the first candidate's text.
    fn generate_text(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;

    /// Generate an image for a prompt.
    fn generate_image(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<GeneratedImage, GenerationError>> + Send;
}

impl<T: GenerationProvider> GenerationProvider for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate_text(prompt).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GenerationError> {
        (**self).generate_image(prompt).await
    }
}
