//! Terminal rendering of stored messages.
//!
//! One line per message: local `HH:MM` time, a role marker, then the text.
//! Images are shown as an `[image]` placeholder with their MIME type; the
//! data URL itself is far too long for a terminal.

use chrono::Local;
use console::style;

use pocketchat_types::message::{Message, MessageBody};

const USER_MARKER: &str = "you";
const AI_MARKER: &str = " ai";

pub fn role_marker(message: &Message) -> &'static str {
    if message.is_user_message {
        USER_MARKER
    } else {
        AI_MARKER
    }
}

/// `HH:MM` in the local time zone.
pub fn local_time(message: &Message) -> String {
    message
        .created_at
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string()
}

pub fn body_text(message: &Message) -> String {
    match message.body() {
        MessageBody::Text(text) => text.to_string(),
        MessageBody::Image(url) => match image_mime(url) {
            Some(mime) => format!("[image] {mime}"),
            None => "[image]".to_string(),
        },
        MessageBody::Empty => String::new(),
    }
}

/// MIME type of a `data:<mime>;base64,...` URL.
fn image_mime(url: &str) -> Option<&str> {
    url.strip_prefix("data:")?
        .split_once(';')
        .map(|(mime, _)| mime)
        .filter(|mime| !mime.is_empty())
}

/// One display line, colored when the terminal supports it.
pub fn render_line(message: &Message) -> String {
    if console::colors_enabled() {
        styled_line(message)
    } else {
        plain_line(message)
    }
}

pub fn plain_line(message: &Message) -> String {
    format!(
        "{} {} | {}",
        local_time(message),
        role_marker(message),
        body_text(message)
    )
}

fn styled_line(message: &Message) -> String {
    let marker = if message.is_user_message {
        style(role_marker(message)).green().bold()
    } else {
        style(role_marker(message)).magenta().bold()
    };
    let body = match message.body() {
        MessageBody::Image(_) => style(body_text(message)).yellow(),
        _ => style(body_text(message)),
    };
    format!(
        "{} {} {} {}",
        style(local_time(message)).dim(),
        marker,
        style("|").dim(),
        body
    )
}
