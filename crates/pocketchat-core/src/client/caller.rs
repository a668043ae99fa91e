//! Typed procedure caller.
//!
//! `ProcedureCaller` has one method per procedure so front ends never build
//! JSON by hand. `InProcessCaller` runs the procedures directly against a
//! fixed request context; the HTTP implementation lives in pocketchat-infra.

use pocketchat_types::error::{ErrorCode, ProcedureError};
use pocketchat_types::message::Message;
use pocketchat_types::procedure::{
    AddAiResponseInput, AddUserMessageInput, GenerateInput, ListMessagesInput,
};
use thiserror::Error;

use crate::context::RequestContext;
use crate::generation::GenerationProvider;
use crate::procedure::Procedures;
use crate::repository::MessageRepository;

/// Failure of a client-side procedure call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The procedure ran and returned one of its own errors.
    #[error(transparent)]
    Procedure(#[from] ProcedureError),

    /// The server rejected the call before reaching a procedure
    /// (unknown name, wrong method).
    #[error("{code}: {message}")]
    Rejected { code: ErrorCode, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// The wire error code, when the failure came from the server.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Procedure(e) => Some(e.code()),
            ClientError::Rejected { code, .. } => Some(*code),
            ClientError::Transport(_) | ClientError::Decode(_) => None,
        }
    }
}

/// One typed async method per procedure.
pub trait ProcedureCaller: Send + Sync {
    fn list_messages(
        &self,
        input: ListMessagesInput,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, ClientError>> + Send;

    fn add_user_message(
        &self,
        input: AddUserMessageInput,
    ) -> impl std::future::Future<Output = Result<Message, ClientError>> + Send;

    fn add_ai_response(
        &self,
        input: AddAiResponseInput,
    ) -> impl std::future::Future<Output = Result<Message, ClientError>> + Send;

    fn generate_text(
        &self,
        input: GenerateInput,
    ) -> impl std::future::Future<Output = Result<String, ClientError>> + Send;

    fn generate_image(
        &self,
        input: GenerateInput,
    ) -> impl std::future::Future<Output = Result<String, ClientError>> + Send;
}

/// Calls procedures in the same process, skipping the transport.
///
/// The context (and therefore the caller identity) is fixed at construction.
pub struct InProcessCaller<R, P> {
    procedures: Procedures<P>,
    context: RequestContext<R>,
}

impl<R, P> InProcessCaller<R, P>
where
    R: MessageRepository,
    P: GenerationProvider,
{
    pub fn new(procedures: Procedures<P>, context: RequestContext<R>) -> Self {
        Self {
            procedures,
            context,
        }
    }

    pub fn context(&self) -> &RequestContext<R> {
        &self.context
    }
}

impl<R, P> ProcedureCaller for InProcessCaller<R, P>
where
    R: MessageRepository,
    P: GenerationProvider,
{
    async fn list_messages(&self, input: ListMessagesInput) -> Result<Vec<Message>, ClientError> {
        Ok(self.procedures.list_messages(&self.context, input).await?)
    }

    async fn add_user_message(&self, input: AddUserMessageInput) -> Result<Message, ClientError> {
        Ok(self.procedures.add_user_message(&self.context, input).await?)
    }

    async fn add_ai_response(&self, input: AddAiResponseInput) -> Result<Message, ClientError> {
        Ok(self.procedures.add_ai_response(&self.context, input).await?)
    }

    async fn generate_text(&self, input: GenerateInput) -> Result<String, ClientError> {
        Ok(self.procedures.generate_text(&self.context, input).await?)
    }

    async fn generate_image(&self, input: GenerateInput) -> Result<String, ClientError> {
        Ok(self.procedures.generate_image(&self.context, input).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryRepository, ScriptedProvider};
    use pocketchat_types::identity::Identity;

    #[tokio::test]
    async fn test_in_process_caller_uses_fixed_identity() {
        let caller = InProcessCaller::new(
            Procedures::new(ScriptedProvider::replying("ok")),
            RequestContext::authenticated(MemoryRepository::new(), Identity::new("carol")),
        );
        let msg = caller
            .add_user_message(AddUserMessageInput {
                content: "hello".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(msg.user_id, "carol");
        assert_eq!(caller.context().repository.insert_count(), 1);
    }

    #[tokio::test]
    async fn test_procedure_errors_keep_their_code() {
        let caller = InProcessCaller::new(
            Procedures::new(ScriptedProvider::replying("ok")),
            RequestContext::anonymous(MemoryRepository::new()),
        );
        let err = caller
            .list_messages(ListMessagesInput::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Unauthorized));
        assert!(matches!(err, ClientError::Procedure(_)));
    }

    #[test]
    fn test_transport_errors_have_no_code() {
        assert_eq!(ClientError::Transport("refused".into()).code(), None);
        let rejected = ClientError::Rejected {
            code: ErrorCode::NotFound,
            message: "No such procedure".into(),
        };
        assert_eq!(rejected.code(), Some(ErrorCode::NotFound));
        assert_eq!(rejected.to_string(), "NOT_FOUND: No such procedure");
    }
}
