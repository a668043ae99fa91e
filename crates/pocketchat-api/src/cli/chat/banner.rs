//! Welcome banner for the interactive chat.

use console::style;

/// Describes where the session's procedures run.
#[derive(Debug, Clone)]
pub enum Backend {
    Local { persistence: &'static str },
    Remote { url: String },
}

pub fn print_welcome_banner(backend: &Backend) {
    let location = match backend {
        Backend::Local { persistence } => format!("in-process ({persistence})"),
        Backend::Remote { url } => url.clone(),
    };

    println!();
    println!("  {} {}", style("*").cyan(), style("PocketChat").cyan().bold());
    println!("  {}  {}", style("Server:").bold(), style(location).dim());
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
