//! Submit orchestration for a chat front end.
//!
//! One `submit` is a linear chain of awaited calls:
//!
//! 1. store the user's message, invalidate history
//! 2. generate a reply (text or image, per the parsed `ChatRequest`)
//! 3. store the reply, invalidate history
//!
//! A failure at any step aborts the rest. The user message may therefore be
//! stored without a reply; nothing is rolled back.

use pocketchat_types::message::Message;
use pocketchat_types::procedure::{AddAiResponseInput, AddUserMessageInput, GenerateInput};
use tracing::{info, warn};

use super::caller::{ClientError, ProcedureCaller};
use super::history::HistoryQuery;
use super::request::ChatRequest;

/// Progress indicators a UI can render while a submit is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityFlags {
    pub submitting: bool,
    pub thinking: bool,
    pub generating_image: bool,
}

impl ActivityFlags {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// The two rows written by a successful submit.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub request: ChatRequest,
    pub user_message: Message,
    pub reply: Message,
}

pub struct ChatSession<C> {
    caller: C,
    history: HistoryQuery,
    flags: ActivityFlags,
}

impl<C: ProcedureCaller> ChatSession<C> {
    pub fn new(caller: C, history_limit: u32) -> Self {
        Self {
            caller,
            history: HistoryQuery::new(history_limit),
            flags: ActivityFlags::default(),
        }
    }

    pub fn caller(&self) -> &C {
        &self.caller
    }

    pub fn flags(&self) -> ActivityFlags {
        self.flags
    }

    pub fn history_query(&self) -> &HistoryQuery {
        &self.history
    }

    /// Current history, refetched when stale.
    pub async fn history(&mut self) -> Result<&[Message], ClientError> {
        self.history.fetch(&self.caller).await
    }

    /// Submit one line of user input.
    ///
    /// Returns `Ok(None)` without calling anything when the input is blank
    /// or a submit is already in progress.
    pub async fn submit(&mut self, input: &str) -> Result<Option<Exchange>, ClientError> {
        let Some(request) = ChatRequest::parse(input) else {
            return Ok(None);
        };
        if self.flags.submitting {
            return Ok(None);
        }

        self.flags.submitting = true;
        let result = self.run(input.trim(), request).await;
        self.flags.reset();

        if let Err(e) = &result {
            warn!(error = %e, "Chat submit failed");
        }
        result.map(Some)
    }

    async fn run(&mut self, line: &str, request: ChatRequest) -> Result<Exchange, ClientError> {
        let user_message = self
            .caller
            .add_user_message(AddUserMessageInput {
                content: line.to_string(),
            })
            .await?;
        self.history.invalidate();

        let reply_input = match &request {
            ChatRequest::Image { prompt } => {
                self.flags.generating_image = true;
                let url = self
                    .caller
                    .generate_image(GenerateInput::new(prompt.clone()))
                    .await?;
                AddAiResponseInput::image(url)
            }
            ChatRequest::Text { prompt } => {
                self.flags.thinking = true;
                let text = self
                    .caller
                    .generate_text(GenerateInput::new(prompt.clone()))
                    .await?;
                AddAiResponseInput::text(text)
            }
        };

        let reply = self.caller.add_ai_response(reply_input).await?;
        self.history.invalidate();

        info!(image = request.is_image(), "Chat exchange stored");
        Ok(Exchange {
            request,
            user_message,
            reply,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pocketchat_types::error::ErrorCode;
    use pocketchat_types::identity::Identity;

    use super::*;
    use crate::client::InProcessCaller;
    use crate::context::RequestContext;
    use crate::procedure::Procedures;
    use crate::testing::{MemoryRepository, ScriptedProvider};

    type TestSession = ChatSession<InProcessCaller<Arc<MemoryRepository>, Arc<ScriptedProvider>>>;

    fn session(provider: ScriptedProvider) -> (TestSession, Arc<MemoryRepository>, Arc<ScriptedProvider>) {
        let repo = Arc::new(MemoryRepository::new());
        let provider = Arc::new(provider);
        let caller = InProcessCaller::new(
            Procedures::new(provider.clone()),
            RequestContext::authenticated(repo.clone(), Identity::new("user_123")),
        );
        (ChatSession::new(caller, 50), repo, provider)
    }

    #[tokio::test]
    async fn test_image_command_end_to_end() {
        let (mut session, repo, provider) = session(ScriptedProvider::replying("unused"));

        let exchange = session
            .submit("generate image: a red cube")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(provider.prompts(), vec!["a red cube".to_string()]);
        assert_eq!(provider.text_calls(), 0);

        assert_eq!(
            exchange.user_message.content.as_deref(),
            Some("generate image: a red cube")
        );
        assert!(exchange.user_message.is_user_message);

        assert!(!exchange.reply.is_user_message);
        assert!(exchange.reply.content.is_none());
        let url = exchange.reply.image_url.as_deref().unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let rows = repo.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], exchange.user_message);
        assert_eq!(rows[1], exchange.reply);

        let history = session.history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].is_user_message);
        assert!(session.flags().is_idle());
    }

    #[tokio::test]
    async fn test_text_message_sends_full_line() {
        let (mut session, repo, provider) = session(ScriptedProvider::replying("Hi there!"));

        let exchange = session.submit("  Hello  ").await.unwrap().unwrap();
        assert_eq!(provider.prompts(), vec!["Hello".to_string()]);
        assert_eq!(exchange.reply.content.as_deref(), Some("Hi there!"));
        assert!(exchange.reply.image_url.is_none());
        assert_eq!(repo.insert_count(), 2);
    }

    #[tokio::test]
    async fn test_blank_input_does_nothing() {
        let (mut session, repo, provider) = session(ScriptedProvider::replying("x"));
        assert!(session.submit("   ").await.unwrap().is_none());
        assert_eq!(repo.insert_count(), 0);
        assert_eq!(provider.text_calls(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_user_row_and_resets_flags() {
        let (mut session, repo, _) = session(ScriptedProvider::failing("upstream 500"));

        let err = session.submit("Hello").await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InternalServerError));
        assert_eq!(err.to_string(), "Failed to generate text");

        let rows = repo.rows();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_user_message);
        assert!(session.flags().is_idle());
        assert!(session.history_query().is_stale());
    }

    #[tokio::test]
    async fn test_image_command_without_prompt_fails_validation() {
        let (mut session, repo, provider) = session(ScriptedProvider::replying("x"));

        let err = session.submit("generate image:").await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::BadRequest));
        assert_eq!(provider.image_calls(), 0);
        assert_eq!(repo.insert_count(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_stops_before_generation() {
        let (mut session, repo, provider) = session(ScriptedProvider::replying("x"));
        repo.set_failing(true);

        let err = session.submit("Hello").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to add message");
        assert_eq!(provider.text_calls(), 0);
    }
}
