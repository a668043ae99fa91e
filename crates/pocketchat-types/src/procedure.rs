//! Procedure names and input schemas.
//!
//! Every procedure input derives [`Validate`]; the rules below are the whole
//! contract for what a caller may send. Unknown fields are rejected at
//! deserialization time.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Default number of messages returned by `listMessages`.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Upper bound for `listMessages.limit`.
pub const MAX_HISTORY_LIMIT: u32 = 100;

fn default_limit() -> u32 {
    DEFAULT_HISTORY_LIMIT
}

/// Input for `listMessages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ListMessagesInput {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: u32,
}

impl Default for ListMessagesInput {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ListMessagesInput {
    pub fn with_limit(limit: u32) -> Self {
        Self { limit }
    }
}

/// Input for `addUserMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AddUserMessageInput {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub content: String,
}

/// Input for `addAiResponse`. At least one of the two fields must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_ai_payload"))]
pub struct AddAiResponseInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "must be a valid URL"))]
    pub image_url: Option<String>,
}

impl AddAiResponseInput {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            image_url: None,
        }
    }

    pub fn image(image_url: impl Into<String>) -> Self {
        Self {
            content: None,
            image_url: Some(image_url.into()),
        }
    }
}

fn validate_ai_payload(input: &AddAiResponseInput) -> Result<(), ValidationError> {
    let has_content = input.content.as_deref().is_some_and(|c| !c.is_empty());
    let has_image = input.image_url.as_deref().is_some_and(|u| !u.is_empty());
    if has_content || has_image {
        Ok(())
    } else {
        Err(ValidationError::new("content_or_image_url")
            .with_message("Either content or image_url must be provided".into()))
    }
}

/// Input for `generateText` and `generateImage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GenerateInput {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub prompt: String,
}

impl GenerateInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Whether a procedure reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    Query,
    Mutation,
}

/// The five remote procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcedureName {
    ListMessages,
    AddUserMessage,
    AddAiResponse,
    GenerateText,
    GenerateImage,
}

impl ProcedureName {
    pub const ALL: [ProcedureName; 5] = [
        ProcedureName::ListMessages,
        ProcedureName::AddUserMessage,
        ProcedureName::AddAiResponse,
        ProcedureName::GenerateText,
        ProcedureName::GenerateImage,
    ];

    /// Canonical wire name, used in `/api/rpc/{name}`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcedureName::ListMessages => "listMessages",
            ProcedureName::AddUserMessage => "addUserMessage",
            ProcedureName::AddAiResponse => "addAiResponse",
            ProcedureName::GenerateText => "generateText",
            ProcedureName::GenerateImage => "generateImage",
        }
    }

    /// Namespaced name used by the web client (`router.procedure`).
    pub fn legacy_alias(&self) -> &'static str {
        match self {
            ProcedureName::ListMessages => "messages.getMessages",
            ProcedureName::AddUserMessage => "messages.addMessage",
            ProcedureName::AddAiResponse => "messages.addAiResponse",
            ProcedureName::GenerateText => "gemini.generateText",
            ProcedureName::GenerateImage => "gemini.generateImage",
        }
    }

    pub fn kind(&self) -> ProcedureKind {
        match self {
            ProcedureName::ListMessages => ProcedureKind::Query,
            _ => ProcedureKind::Mutation,
        }
    }
}

impl std::fmt::Display for ProcedureName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProcedureName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcedureName::ALL
            .into_iter()
            .find(|p| p.as_str() == s || p.legacy_alias() == s)
            .ok_or_else(|| format!("unknown procedure: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_input_defaults_limit() {
        let input: ListMessagesInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.limit, 50);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_list_input_limit_bounds() {
        assert!(ListMessagesInput::with_limit(1).validate().is_ok());
        assert!(ListMessagesInput::with_limit(100).validate().is_ok());
        assert!(ListMessagesInput::with_limit(0).validate().is_err());
        assert!(ListMessagesInput::with_limit(101).validate().is_err());
    }

    #[test]
    fn test_list_input_rejects_negative_and_ignores_extra_keys() {
        assert!(serde_json::from_str::<ListMessagesInput>(r#"{"limit": -1}"#).is_err());
        let input: ListMessagesInput =
            serde_json::from_str(r#"{"limit": 5, "user_id": "x"}"#).unwrap();
        assert_eq!(input, ListMessagesInput::with_limit(5));
    }

    #[test]
    fn test_user_message_requires_content() {
        let empty = AddUserMessageInput {
            content: String::new(),
        };
        let errors = empty.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("content"));

        let ok = AddUserMessageInput {
            content: "hi".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_user_message_drops_supplied_owner() {
        // The input has no owner field; the row owner comes from the identity.
        let json = r#"{"content": "hi", "user_id": "someone_else"}"#;
        let input: AddUserMessageInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.content, "hi");
        assert!(!serde_json::to_string(&input).unwrap().contains("someone_else"));
    }

    #[test]
    fn test_ai_response_requires_a_field() {
        let empty: AddAiResponseInput = serde_json::from_str("{}").unwrap();
        assert!(empty.validate().is_err());

        let blank = AddAiResponseInput {
            content: Some(String::new()),
            image_url: None,
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_ai_response_url_must_be_well_formed() {
        assert!(AddAiResponseInput::image("not-a-url").validate().is_err());
        assert!(AddAiResponseInput::image("https://example.com/a.png").validate().is_ok());
        assert!(AddAiResponseInput::image("data:image/jpeg;base64,/9j/4AAQ").validate().is_ok());
    }

    #[test]
    fn test_ai_response_text_only_is_valid() {
        assert!(AddAiResponseInput::text("Hello!").validate().is_ok());
    }

    #[test]
    fn test_generate_input_requires_prompt() {
        assert!(GenerateInput::new("").validate().is_err());
        assert!(GenerateInput::new("a red cube").validate().is_ok());
        assert!(serde_json::from_str::<GenerateInput>("{}").is_err());
    }

    #[test]
    fn test_procedure_name_parsing() {
        for name in ProcedureName::ALL {
            assert_eq!(name.as_str().parse::<ProcedureName>(), Ok(name));
            assert_eq!(name.legacy_alias().parse::<ProcedureName>(), Ok(name));
        }
        assert!("deleteMessage".parse::<ProcedureName>().is_err());
    }

    #[test]
    fn test_only_list_is_a_query() {
        let queries: Vec<_> = ProcedureName::ALL
            .into_iter()
            .filter(|p| p.kind() == ProcedureKind::Query)
            .collect();
        assert_eq!(queries, vec![ProcedureName::ListMessages]);
    }
}
