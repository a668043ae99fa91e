//! Chat input parsing.

/// Prefix that turns a chat line into an image request. Matched
/// case-insensitively.
pub const IMAGE_COMMAND: &str = "generate image:";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRequest {
    Text { prompt: String },
    Image { prompt: String },
}

impl ChatRequest {
    /// Parse a raw input line. Returns `None` for blank input.
    ///
    /// `Text` keeps the whole trimmed line (prefix-free text is the prompt).
    /// `Image` strips the command and trims what remains.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let marker = IMAGE_COMMAND.len();
        let is_image = trimmed
            .get(..marker)
            .is_some_and(|head| head.eq_ignore_ascii_case(IMAGE_COMMAND));

        if is_image {
            Some(ChatRequest::Image {
                prompt: trimmed[marker..].trim().to_string(),
            })
        } else {
            Some(ChatRequest::Text {
                prompt: trimmed.to_string(),
            })
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            ChatRequest::Text { prompt } | ChatRequest::Image { prompt } => prompt,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, ChatRequest::Image { .. })
    }
}
