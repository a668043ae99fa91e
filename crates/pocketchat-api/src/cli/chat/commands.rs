//! Slash commands for the chat loop.
//!
//! Anything that does not start with `/` is a chat message, including
//! `generate image: ...` requests.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Clear,
    Exit,
    /// Reprint the stored conversation.
    History,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/history" => Some(ChatCommand::History),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

pub fn help_text() -> String {
    format!(
        "\n  {}\n  {}  {}\n  {}  {}\n  {}  {}\n  {}  {}\n\n  {}\n",
        style("Commands").bold(),
        style("/history").cyan(),
        "reprint the conversation",
        style("/clear  ").cyan(),
        "clear the screen",
        style("/help   ").cyan(),
        "show this list",
        style("/exit   ").cyan(),
        "leave (or Ctrl+D)",
        style("Start a message with \"generate image:\" to ask for a picture.").dim(),
    )
}
