//! Message history procedures.

use pocketchat_types::error::ProcedureError;
use pocketchat_types::message::{Message, NewMessage};
use pocketchat_types::procedure::{AddAiResponseInput, AddUserMessageInput, ListMessagesInput};
use tracing::{debug, error};

use super::{Procedures, check};
use crate::context::RequestContext;
use crate::gate::authorize;
use crate::generation::GenerationProvider;
use crate::repository::MessageRepository;

impl<P: GenerationProvider> Procedures<P> {
    /// The caller's `limit` most recent messages, oldest first.
    pub async fn list_messages<R: MessageRepository>(
        &self,
        ctx: &RequestContext<R>,
        input: ListMessagesInput,
    ) -> Result<Vec<Message>, ProcedureError> {
        check(&input)?;
        let auth = authorize(ctx)?;

        let mut rows = auth
            .repository
            .list_recent(&auth.identity.sub, input.limit)
            .await
            .map_err(|e| {
                error!(procedure = "listMessages", user_id = %auth.identity, limit = input.limit, error = %e, "Error fetching messages");
                ProcedureError::Internal("Failed to fetch messages".to_string())
            })?;

        // Store returns newest first.
        rows.reverse();
        debug!(user_id = %auth.identity, count = rows.len(), "Listed messages");
        Ok(rows)
    }

    /// Store a message typed by the caller.
    pub async fn add_user_message<R: MessageRepository>(
        &self,
        ctx: &RequestContext<R>,
        input: AddUserMessageInput,
    ) -> Result<Message, ProcedureError> {
        check(&input)?;
        let auth = authorize(ctx)?;

        let row = NewMessage::user(auth.identity, input.content);
        auth.repository.insert(&row).await.map_err(|e| {
            error!(procedure = "addUserMessage", user_id = %auth.identity, error = %e, "Error adding message");
            ProcedureError::Internal("Failed to add message".to_string())
        })
    }

    /// Store an assistant reply (text, image, or both) on the caller's behalf.
    pub async fn add_ai_response<R: MessageRepository>(
        &self,
        ctx: &RequestContext<R>,
        input: AddAiResponseInput,
    ) -> Result<Message, ProcedureError> {
        check(&input)?;
        let auth = authorize(ctx)?;

        let row = NewMessage::ai(auth.identity, input.content, input.image_url);
        auth.repository.insert(&row).await.map_err(|e| {
            error!(procedure = "addAiResponse", user_id = %auth.identity, error = %e, "Error adding AI response");
            ProcedureError::Internal("Failed to add AI response".to_string())
        })
    }
}
