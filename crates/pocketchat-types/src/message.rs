//! Chat message domain types.
//!
//! `Message` is the only persisted entity. Rows are created through
//! [`NewMessage`], whose constructors take the owner from an [`Identity`]
//! so that `user_id` can never come from client input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// A stored chat message, authored either by the user or by the AI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Opaque identifier assigned by the persistence layer. Row stores with
    /// integer keys are accepted and the key is kept in its decimal form.
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// Owner subject id.
    pub user_id: String,
    /// Text body.
    #[serde(default)]
    pub content: Option<String>,
    /// URL or data URL of a generated image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// `true` for human-authored messages, `false` for AI-authored ones.
    pub is_user_message: bool,
    /// Server-assigned creation time; also the ordering key.
    pub created_at: DateTime<Utc>,
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// What a message displays: an image wins over text when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageBody<'a> {
    Text(&'a str),
    Image(&'a str),
    Empty,
}

impl Message {
    pub fn body(&self) -> MessageBody<'_> {
        match (self.image_url.as_deref(), self.content.as_deref()) {
            (Some(url), _) if !url.is_empty() => MessageBody::Image(url),
            (_, Some(text)) => MessageBody::Text(text),
            _ => MessageBody::Empty,
        }
    }
}

/// Insert payload for a new message row.
///
/// `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMessage {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_user_message: bool,
}

impl NewMessage {
    /// A human-authored message. Always text, never an image.
    pub fn user(identity: &Identity, content: String) -> Self {
        Self {
            user_id: identity.sub.clone(),
            content: Some(content),
            image_url: None,
            is_user_message: true,
        }
    }

    /// An AI-authored message carrying generated text and/or an image.
    pub fn ai(identity: &Identity, content: Option<String>, image_url: Option<String>) -> Self {
        Self {
            user_id: identity.sub.clone(),
            content,
            image_url,
            is_user_message: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(content: Option<&str>, image_url: Option<&str>) -> Message {
        Message {
            id: "m1".to_string(),
            user_id: "user_123".to_string(),
            content: content.map(str::to_string),
            image_url: image_url.map(str::to_string),
            is_user_message: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_message_never_carries_image() {
        let msg = NewMessage::user(&Identity::new("alice"), "hi".to_string());
        assert_eq!(msg.user_id, "alice");
        assert_eq!(msg.content.as_deref(), Some("hi"));
        assert!(msg.image_url.is_none());
        assert!(msg.is_user_message);
    }

    #[test]
    fn test_ai_message_owner_comes_from_identity() {
        let msg = NewMessage::ai(
            &Identity::new("bob"),
            None,
            Some("https://example.com/cat.png".to_string()),
        );
        assert_eq!(msg.user_id, "bob");
        assert!(!msg.is_user_message);
    }

    #[test]
    fn test_new_message_omits_absent_fields() {
        let msg = NewMessage::ai(&Identity::new("bob"), Some("hello".to_string()), None);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["content"], "hello");
        assert!(json.get("image_url").is_none());
        assert_eq!(json["is_user_message"], false);
    }

    #[test]
    fn test_body_prefers_image() {
        let msg = sample(Some(""), Some("https://example.com/image.jpg"));
        assert_eq!(msg.body(), MessageBody::Image("https://example.com/image.jpg"));

        let msg = sample(Some("Hi there"), None);
        assert_eq!(msg.body(), MessageBody::Text("Hi there"));

        let msg = sample(None, None);
        assert_eq!(msg.body(), MessageBody::Empty);
    }

    #[test]
    fn test_message_deserializes_row_with_nulls() {
        let json = r#"{
            "id": "42",
            "user_id": "user_123",
            "content": null,
            "image_url": "data:image/jpeg;base64,AAAA",
            "is_user_message": false,
            "created_at": "2025-03-01T10:15:00.123456+00:00"
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert!(msg.content.is_none());
        assert_eq!(msg.id, "42");

        let numeric = json.replace(r#""id": "42""#, r#""id": 42"#);
        let msg: Message = serde_json::from_str(&numeric).unwrap();
        assert_eq!(msg.id, "42");
        assert!(matches!(msg.body(), MessageBody::Image(_)));
    }
}
