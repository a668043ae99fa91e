//! The five callable procedures and their dynamic dispatcher.
//!
//! Every procedure runs the same pipeline: deserialize and validate the
//! input, pass the gate, perform the effect, then map any persistence or
//! provider failure to a fixed generic message. Causes are logged, never
//! returned.
//!
//! - `messages`: `listMessages`, `addUserMessage`, `addAiResponse`
//! - `generation`: `generateText`, `generateImage`

mod generation;
mod messages;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use pocketchat_types::error::ProcedureError;
use pocketchat_types::procedure::{
    AddAiResponseInput, AddUserMessageInput, GenerateInput, ListMessagesInput, ProcedureName,
};

use crate::context::RequestContext;
use crate::generation::GenerationProvider;
use crate::repository::MessageRepository;

/// Procedure set bound to one generation provider.
///
/// The repository is not stored here: it comes from the `RequestContext`
/// of each call, next to the caller identity.
pub struct Procedures<P> {
    provider: P,
}

impl<P: GenerationProvider> Procedures<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Invoke a procedure by name with an untyped JSON input.
    ///
    /// A `null` input is treated as `{}` so that input-less calls work.
    pub async fn dispatch<R: MessageRepository>(
        &self,
        name: ProcedureName,
        ctx: &RequestContext<R>,
        input: Value,
    ) -> Result<Value, ProcedureError> {
        match name {
            ProcedureName::ListMessages => {
                let input: ListMessagesInput = parse_input(input)?;
                to_output(&self.list_messages(ctx, input).await?)
            }
            ProcedureName::AddUserMessage => {
                let input: AddUserMessageInput = parse_input(input)?;
                to_output(&self.add_user_message(ctx, input).await?)
            }
            ProcedureName::AddAiResponse => {
                let input: AddAiResponseInput = parse_input(input)?;
                to_output(&self.add_ai_response(ctx, input).await?)
            }
            ProcedureName::GenerateText => {
                let input: GenerateInput = parse_input(input)?;
                to_output(&self.generate_text(ctx, input).await?)
            }
            ProcedureName::GenerateImage => {
                let input: GenerateInput = parse_input(input)?;
                to_output(&self.generate_image(ctx, input).await?)
            }
        }
    }
}

/// Deserialize an untyped input. Structural problems (wrong types, missing
/// fields) are the caller's fault; extra keys are dropped.
pub fn parse_input<T: DeserializeOwned>(input: Value) -> Result<T, ProcedureError> {
    let input = if input.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        input
    };
    serde_json::from_value(input).map_err(|e| ProcedureError::BadRequest(format!("Invalid input: {e}")))
}

/// Run the declarative rules on an already-typed input.
fn check<T: Validate>(input: &T) -> Result<(), ProcedureError> {
    input.validate().map_err(ProcedureError::from)
}

fn to_output<T: Serialize>(output: &T) -> Result<Value, ProcedureError> {
    serde_json::to_value(output).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize procedure output");
        ProcedureError::Internal("Failed to serialize response".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use pocketchat_types::error::ErrorCode;
    use pocketchat_types::identity::Identity;
    use pocketchat_types::message::Message;
    use serde_json::json;

    use crate::testing::{MemoryRepository, ScriptedProvider};

    fn setup(
        provider: ScriptedProvider,
    ) -> (
        Procedures<Arc<ScriptedProvider>>,
        Arc<ScriptedProvider>,
        RequestContext<Arc<MemoryRepository>>,
    ) {
        let provider = Arc::new(provider);
        let ctx = RequestContext::authenticated(
            Arc::new(MemoryRepository::new()),
            Identity::new("user_123"),
        );
        (Procedures::new(provider.clone()), provider, ctx)
    }

    #[tokio::test]
    async fn test_dispatch_lists_oldest_first() {
        let (procs, _, ctx) = setup(ScriptedProvider::replying("ok"));
        for content in ["one", "two", "three"] {
            procs
                .dispatch(ProcedureName::AddUserMessage, &ctx, json!({ "content": content }))
                .await
                .unwrap();
        }

        let out = procs
            .dispatch(ProcedureName::ListMessages, &ctx, json!({ "limit": 2 }))
            .await
            .unwrap();
        let rows: Vec<Message> = serde_json::from_value(out).unwrap();
        let contents: Vec<_> = rows.iter().filter_map(|m| m.content.as_deref()).collect();
        assert_eq!(contents, vec!["two", "three"]);
    }

    #[tokio::test]
    async fn test_null_input_uses_defaults() {
        let (procs, _, ctx) = setup(ScriptedProvider::replying("ok"));
        let out = procs
            .dispatch(ProcedureName::ListMessages, &ctx, Value::Null)
            .await
            .unwrap();
        assert_eq!(out, json!([]));
        assert_eq!(ctx.repository.list_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_input_is_bad_request() {
        let (procs, _, ctx) = setup(ScriptedProvider::replying("ok"));

        let err = procs
            .dispatch(ProcedureName::AddUserMessage, &ctx, json!({ "content": 42 }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);

        let err = procs
            .dispatch(ProcedureName::GenerateText, &ctx, json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert_eq!(ctx.repository.insert_count(), 0);
    }

    #[tokio::test]
    async fn test_extra_keys_are_ignored_and_owner_comes_from_identity() {
        let (procs, _, ctx) = setup(ScriptedProvider::replying("ok"));
        let out = procs
            .dispatch(
                ProcedureName::AddUserMessage,
                &ctx,
                json!({ "content": "hi", "user_id": "someone_else", "client": "web" }),
            )
            .await
            .unwrap();
        let stored: Message = serde_json::from_value(out).unwrap();
        assert_eq!(stored.user_id, "user_123");
        assert_eq!(ctx.repository.insert_count(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_generate_image_returns_data_url() {
        let (procs, provider, ctx) = setup(ScriptedProvider::replying("ok"));
        let out = procs
            .dispatch(ProcedureName::GenerateImage, &ctx, json!({ "prompt": "a red cube" }))
            .await
            .unwrap();
        let url = out.as_str().unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(provider.prompts(), vec!["a red cube".to_string()]);
    }

    #[tokio::test]
    async fn test_anonymous_dispatch_is_rejected_for_every_procedure() {
        let provider = Arc::new(ScriptedProvider::replying("ok"));
        let procs = Procedures::new(provider.clone());
        let repo = Arc::new(MemoryRepository::new());
        let ctx = RequestContext::anonymous(repo.clone());

        let inputs = [
            (ProcedureName::ListMessages, json!({})),
            (ProcedureName::AddUserMessage, json!({ "content": "hi" })),
            (ProcedureName::AddAiResponse, json!({ "content": "hi" })),
            (ProcedureName::GenerateText, json!({ "prompt": "hi" })),
            (ProcedureName::GenerateImage, json!({ "prompt": "hi" })),
        ];
        for (name, input) in inputs {
            let err = procs.dispatch(name, &ctx, input).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::Unauthorized, "{name}");
        }

        assert_eq!(repo.insert_count(), 0);
        assert_eq!(repo.list_count(), 0);
        assert_eq!(provider.text_calls() + provider.image_calls(), 0);
    }
}
