//! HTTP implementation of [`ProcedureCaller`].
//!
//! Queries go out as `GET {base}/api/rpc/{name}?input=<json>`, mutations as
//! `POST {base}/api/rpc/{name}` with a JSON body. Inputs are validated before
//! sending, so a malformed call fails locally with the same `BAD_REQUEST`
//! the server would return.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use pocketchat_core::client::{ClientError, ProcedureCaller};
use pocketchat_types::error::ProcedureError;
use pocketchat_types::message::Message;
use pocketchat_types::procedure::{
    AddAiResponseInput, AddUserMessageInput, GenerateInput, ListMessagesInput, ProcedureKind,
    ProcedureName,
};
use pocketchat_types::rpc::{RPC_PREFIX, RpcEnvelope};

/// Calls a remote PocketChat server.
pub struct HttpProcedureCaller {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
}

impl HttpProcedureCaller {
    /// `token` is sent as `Authorization: Bearer <token>` when present.
    pub fn new(
        base_url: &str,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, name: ProcedureName) -> String {
        format!("{}{RPC_PREFIX}/{name}", self.base_url)
    }

    async fn call<I, O>(&self, name: ProcedureName, input: &I) -> Result<O, ClientError>
    where
        I: Serialize + Validate + Sync,
        O: DeserializeOwned,
    {
        input.validate().map_err(ProcedureError::from)?;

        let request = match name.kind() {
            ProcedureKind::Query => {
                let encoded = serde_json::to_string(input)
                    .map_err(|e| ClientError::Decode(format!("failed to encode input: {e}")))?;
                self.client
                    .get(self.url(name))
                    .query(&[("input", encoded.as_str())])
            }
            ProcedureKind::Mutation => self.client.post(self.url(name)).json(input),
        };
        let request = match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        debug!(procedure = %name, "Calling remote procedure");
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status();

        let envelope: RpcEnvelope<O> = response.json().await.map_err(|e| {
            ClientError::Decode(format!("unexpected response (HTTP {status}): {e}"))
        })?;

        if let Some(error) = envelope.error {
            let (code, message) = (error.code, error.message.clone());
            return Err(match ProcedureError::from_body(error) {
                Some(procedure_error) => ClientError::Procedure(procedure_error),
                None => ClientError::Rejected { code, message },
            });
        }

        envelope
            .result
            .ok_or_else(|| ClientError::Decode(format!("response (HTTP {status}) has no result")))
    }
}

impl ProcedureCaller for HttpProcedureCaller {
    async fn list_messages(&self, input: ListMessagesInput) -> Result<Vec<Message>, ClientError> {
        self.call(ProcedureName::ListMessages, &input).await
    }

    async fn add_user_message(&self, input: AddUserMessageInput) -> Result<Message, ClientError> {
        self.call(ProcedureName::AddUserMessage, &input).await
    }

    async fn add_ai_response(&self, input: AddAiResponseInput) -> Result<Message, ClientError> {
        self.call(ProcedureName::AddAiResponse, &input).await
    }

    async fn generate_text(&self, input: GenerateInput) -> Result<String, ClientError> {
        self.call(ProcedureName::GenerateText, &input).await
    }

    async fn generate_image(&self, input: GenerateInput) -> Result<String, ClientError> {
        self.call(ProcedureName::GenerateImage, &input).await
    }
}
