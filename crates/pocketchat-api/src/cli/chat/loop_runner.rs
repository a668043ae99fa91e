//! Interactive chat loop.
//!
//! Prints the stored conversation, then reads lines until Ctrl+D or
//! `/exit`. Each non-command line goes through `ChatSession::submit`; a
//! failed submit prints the error and the loop keeps going.

use std::io::Write;

use console::style;
use tracing::debug;

use pocketchat_core::client::{ChatRequest, ChatSession, ProcedureCaller};

use super::banner::{Backend, print_welcome_banner};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::oneshot::activity_label;
use super::renderer::render_line;

pub async fn run_chat_loop<C: ProcedureCaller>(
    session: &mut ChatSession<C>,
    backend: &Backend,
) -> anyhow::Result<()> {
    print_welcome_banner(backend);

    let (mut input, mut out) = ChatInput::new(format!("{} ", style("you>").green().bold()))?;

    print_history(session, &mut out).await?;

    loop {
        let line = match input.read_line().await {
            InputEvent::Line(line) => line,
            InputEvent::Eof | InputEvent::Interrupted => break,
        };

        if let Some(command) = commands::parse(&line) {
            match command {
                ChatCommand::Exit => break,
                ChatCommand::Help => write!(out, "{}", commands::help_text())?,
                ChatCommand::Clear => input.clear(),
                ChatCommand::History => print_history(session, &mut out).await?,
                ChatCommand::Unknown(name) => writeln!(
                    out,
                    "  {} Unknown command {name}. Type /help for a list.",
                    style("?").yellow().bold()
                )?,
            }
            continue;
        }

        let Some(request) = ChatRequest::parse(&line) else {
            continue;
        };
        writeln!(out, "  {}", style(activity_label(&request)).dim())?;

        match session.submit(&line).await {
            Ok(Some(exchange)) => writeln!(out, "  {}", render_line(&exchange.reply))?,
            Ok(None) => debug!("Submit skipped"),
            Err(e) => writeln!(out, "  {} {e}", style("!").red().bold())?,
        }
    }

    input.finish();
    println!("\n  {}", style("Bye.").dim());
    Ok(())
}

async fn print_history<C: ProcedureCaller, W: Write>(
    session: &mut ChatSession<C>,
    out: &mut W,
) -> anyhow::Result<()> {
    match session.history().await {
        Ok(messages) if messages.is_empty() => {
            writeln!(out, "  {}", style("No messages yet. Say hello!").dim())?;
        }
        Ok(messages) => {
            for message in messages {
                writeln!(out, "  {}", render_line(message))?;
            }
        }
        Err(e) => writeln!(
            out,
            "  {} Could not load history: {e}",
            style("!").yellow().bold()
        )?,
    }
    Ok(())
}
