//! Non-interactive `send` and `history` commands.

use std::time::Duration;

use anyhow::bail;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use pocketchat_core::client::{ChatRequest, ChatSession, Exchange, ProcedureCaller};

use super::renderer::render_line;

/// Submit one message and print the stored exchange.
pub async fn send<C: ProcedureCaller>(
    session: &mut ChatSession<C>,
    text: &str,
    json: bool,
) -> anyhow::Result<()> {
    let Some(request) = ChatRequest::parse(text) else {
        bail!("Nothing to send: the message is empty");
    };

    let spinner = (!json).then(|| spinner(activity_label(&request)));
    let result = session.submit(text).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let Some(exchange) = result? else {
        bail!("Nothing to send: the message is empty");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&exchange_json(&exchange))?);
    } else {
        println!("  {}", render_line(&exchange.user_message));
        println!("  {}", render_line(&exchange.reply));
    }
    Ok(())
}

/// Print the caller's recent conversation, oldest first.
pub async fn history<C: ProcedureCaller>(
    session: &mut ChatSession<C>,
    json: bool,
) -> anyhow::Result<()> {
    let messages = session.history().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!("  {}", style("No messages yet.").dim());
    }
    for message in messages {
        println!("  {}", render_line(message));
    }
    Ok(())
}

pub fn activity_label(request: &ChatRequest) -> &'static str {
    if request.is_image() {
        "generating image..."
    } else {
        "thinking..."
    }
}

fn exchange_json(exchange: &Exchange) -> serde_json::Value {
    serde_json::json!({
        "kind": if exchange.request.is_image() { "image" } else { "text" },
        "prompt": exchange.request.prompt(),
        "user_message": exchange.user_message,
        "reply": exchange.reply,
    })
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use pocketchat_core::client::InProcessCaller;
    use pocketchat_core::context::RequestContext;
    use pocketchat_core::procedure::Procedures;
    use pocketchat_core::testing::{MemoryRepository, ScriptedProvider};
    use pocketchat_types::identity::Identity;

    fn session(
        provider: ScriptedProvider,
    ) -> (
        ChatSession<InProcessCaller<Arc<MemoryRepository>, ScriptedProvider>>,
        Arc<MemoryRepository>,
    ) {
        let repo = Arc::new(MemoryRepository::new());
        let ctx = RequestContext::authenticated(repo.clone(), Identity::new("user_123"));
        let caller = InProcessCaller::new(Procedures::new(provider), ctx);
        (ChatSession::new(caller, 50), repo)
    }

    #[tokio::test]
    async fn test_send_stores_both_rows() {
        let (mut session, repo) = session(ScriptedProvider::replying("Hi there"));
        send(&mut session, "hello", true).await.unwrap();

        let rows = repo.rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_user_message);
        assert_eq!(rows[1].content.as_deref(), Some("Hi there"));
    }

    #[tokio::test]
    async fn test_send_blank_is_an_error_without_calls() {
        let (mut session, repo) = session(ScriptedProvider::replying("Hi"));
        assert!(send(&mut session, "   ", true).await.is_err());
        assert_eq!(repo.insert_count(), 0);
    }

    #[tokio::test]
    async fn test_send_surfaces_generation_failure() {
        let (mut session, repo) = session(ScriptedProvider::failing("boom"));
        let err = send(&mut session, "hello", true).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate text");
        // The user message stays; nothing is rolled back.
        assert_eq!(repo.insert_count(), 1);
    }

    #[tokio::test]
    async fn test_history_reads_once_when_fresh() {
        let (mut session, repo) = session(ScriptedProvider::replying("Hi"));
        history(&mut session, true).await.unwrap();
        history(&mut session, true).await.unwrap();
        assert_eq!(repo.list_count(), 1);
    }

    #[test]
    fn test_activity_label() {
        let image = ChatRequest::parse("Generate Image: a fox").unwrap();
        let text = ChatRequest::parse("a fox").unwrap();
        assert_eq!(activity_label(&image), "generating image...");
        assert_eq!(activity_label(&text), "thinking...");
    }
}
