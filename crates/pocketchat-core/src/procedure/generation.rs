//! Generation procedures. Neither one persists anything.

use pocketchat_types::error::ProcedureError;
use pocketchat_types::procedure::GenerateInput;
use tracing::{error, info};

use super::{Procedures, check};
use crate::context::RequestContext;
use crate::gate::authorize;
use crate::generation::GenerationProvider;
use crate::repository::MessageRepository;

impl<P: GenerationProvider> Procedures<P> {
    /// Text completion for `prompt`.
    pub async fn generate_text<R: MessageRepository>(
        &self,
        ctx: &RequestContext<R>,
        input: GenerateInput,
    ) -> Result<String, ProcedureError> {
        check(&input)?;
        let auth = authorize(ctx)?;

        let text = self.provider.generate_text(&input.prompt).await.map_err(|e| {
            error!(
                procedure = "generateText",
                provider = self.provider.name(),
                user_id = %auth.identity,
                error = %e,
                "Error generating text"
            );
            ProcedureError::Internal("Failed to generate text".to_string())
        })?;

        info!(user_id = %auth.identity, chars = text.len(), "Generated text");
        Ok(text)
    }

    /// Image for `prompt`, returned as a `data:` URL.
    pub async fn generate_image<R: MessageRepository>(
        &self,
        ctx: &RequestContext<R>,
        input: GenerateInput,
    ) -> Result<String, ProcedureError> {
        check(&input)?;
        let auth = authorize(ctx)?;

        let image = self.provider.generate_image(&input.prompt).await.map_err(|e| {
            error!(
                procedure = "generateImage",
                provider = self.provider.name(),
                user_id = %auth.identity,
                error = %e,
                "Error generating image"
            );
            ProcedureError::Internal("Failed to generate image".to_string())
        })?;

        info!(user_id = %auth.identity, mime_type = %image.mime_type, "Generated image");
        Ok(image.to_data_url())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pocketchat_types::error::ErrorCode;
    use pocketchat_types::identity::Identity;

    use super::*;
    use crate::generation::GeneratedImage;
    use crate::testing::{MemoryRepository, ScriptedProvider};

    fn ctx() -> RequestContext<Arc<MemoryRepository>> {
        RequestContext::authenticated(Arc::new(MemoryRepository::new()), Identity::new("user_123"))
    }

    #[tokio::test]
    async fn test_generate_text_returns_provider_text() {
        let procs = Procedures::new(ScriptedProvider::replying("Hi there"));
        let ctx = ctx();
        let text = procs
            .generate_text(&ctx, GenerateInput::new("hello"))
            .await
            .unwrap();
        assert_eq!(text, "Hi there");
        assert_eq!(ctx.repository.insert_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_text_hides_provider_detail() {
        let procs = Procedures::new(ScriptedProvider::failing("quota exceeded for key AIza..."));
        let err = procs
            .generate_text(&ctx(), GenerateInput::new("hello"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InternalServerError);
        assert_eq!(err.message(), "Failed to generate text");
    }

    #[tokio::test]
    async fn test_generate_image_encodes_data_url() {
        let provider =
            ScriptedProvider::replying("").with_image(GeneratedImage::new("iVBORw0KGgo=", Some("image/png".into())));
        let procs = Procedures::new(provider);
        let url = procs
            .generate_image(&ctx(), GenerateInput::new("a red cube"))
            .await
            .unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_generate_image_failure_is_generic() {
        let procs = Procedures::new(ScriptedProvider::failing("503 upstream"));
        let err = procs
            .generate_image(&ctx(), GenerateInput::new("a red cube"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Failed to generate image");
    }

    #[tokio::test]
    async fn test_empty_prompt_never_reaches_provider() {
        let provider = Arc::new(ScriptedProvider::replying("x"));
        let procs = Procedures::new(provider.clone());
        let err = procs
            .generate_text(&ctx(), GenerateInput::new(""))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert_eq!(provider.text_calls(), 0);
    }

    #[tokio::test]
    async fn test_anonymous_generation_never_reaches_provider() {
        let provider = Arc::new(ScriptedProvider::replying("x"));
        let procs = Procedures::new(provider.clone());
        let anon = RequestContext::anonymous(Arc::new(MemoryRepository::new()));
        let err = procs
            .generate_image(&anon, GenerateInput::new("a cat"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(provider.image_calls(), 0);
    }
}
