//! Caller selection for client commands.

use pocketchat_core::client::{ClientError, InProcessCaller, ProcedureCaller};
use pocketchat_core::generation::BoxGenerationProvider;
use pocketchat_core::repository::BoxMessageRepository;
use pocketchat_infra::rpc_client::HttpProcedureCaller;
use pocketchat_types::message::Message;
use pocketchat_types::procedure::{
    AddAiResponseInput, AddUserMessageInput, GenerateInput, ListMessagesInput,
};

/// Either a remote server or the procedures compiled into this binary.
pub enum ClientCaller {
    Remote(HttpProcedureCaller),
    Local(InProcessCaller<BoxMessageRepository, BoxGenerationProvider>),
}

impl ProcedureCaller for ClientCaller {
    async fn list_messages(&self, input: ListMessagesInput) -> Result<Vec<Message>, ClientError> {
        match self {
            ClientCaller::Remote(c) => c.list_messages(input).await,
            ClientCaller::Local(c) => c.list_messages(input).await,
        }
    }

    async fn add_user_message(&self, input: AddUserMessageInput) -> Result<Message, ClientError> {
        match self {
            ClientCaller::Remote(c) => c.add_user_message(input).await,
            ClientCaller::Local(c) => c.add_user_message(input).await,
        }
    }

    async fn add_ai_response(&self, input: AddAiResponseInput) -> Result<Message, ClientError> {
        match self {
            ClientCaller::Remote(c) => c.add_ai_response(input).await,
            ClientCaller::Local(c) => c.add_ai_response(input).await,
        }
    }

    async fn generate_text(&self, input: GenerateInput) -> Result<String, ClientError> {
        match self {
            ClientCaller::Remote(c) => c.generate_text(input).await,
            ClientCaller::Local(c) => c.generate_text(input).await,
        }
    }

    async fn generate_image(&self, input: GenerateInput) -> Result<String, ClientError> {
        match self {
            ClientCaller::Remote(c) => c.generate_image(input).await,
            ClientCaller::Local(c) => c.generate_image(input).await,
        }
    }
}
