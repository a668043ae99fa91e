//! BoxGenerationProvider -- object-safe dynamic dispatch wrapper for GenerationProvider.
//!
//! 1. Define an object-safe `GenerationProviderDyn` trait with boxed futures
//! 2. Blanket-impl `GenerationProviderDyn` for all `T: GenerationProvider`
//! 3. `BoxGenerationProvider` wraps `Box<dyn GenerationProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use pocketchat_types::error::GenerationError;

use super::provider::{GeneratedImage, GenerationProvider};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`GenerationProvider`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch.
pub trait GenerationProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_text_boxed<'a>(&'a self, prompt: &'a str)
    -> BoxFuture<'a, Result<String, GenerationError>>;

    fn generate_image_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<GeneratedImage, GenerationError>>;
}

impl<T: GenerationProvider> GenerationProviderDyn for T {
    fn name(&self) -> &str {
        GenerationProvider::name(self)
    }

    fn generate_text_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, GenerationError>> {
        Box::pin(self.generate_text(prompt))
    }

    fn generate_image_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<GeneratedImage, GenerationError>> {
        Box::pin(self.generate_image(prompt))
    }
}

/// Type-erased generation provider for runtime provider selection.
pub struct BoxGenerationProvider {
    inner: Box<dyn GenerationProviderDyn>,
}

impl BoxGenerationProvider {
    pub fn new<T: GenerationProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }
}

impl GenerationProvider for BoxGenerationProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        self.inner.generate_text_boxed(prompt).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GenerationError> {
        self.inner.generate_image_boxed(prompt).await
    }
}
