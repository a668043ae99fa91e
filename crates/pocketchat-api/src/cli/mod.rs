//! CLI command definitions for the `pchat` binary.
//!
//! Uses clap derive macros for argument parsing. Client commands (`send`,
//! `history`, `chat`) talk to a server when `--server-url` is given and run
//! the procedures in-process otherwise.

pub mod chat;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pocketchat_types::procedure::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};

/// Chat with Gemini from your terminal, or serve the chat procedures over HTTP.
#[derive(Parser)]
#[command(name = "pchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Detailed logs (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Config file (defaults to ~/.pocketchat/config.toml when present).
    #[arg(long, global = true, env = "POCKETCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of a running `pchat serve`. Without it, client commands run
    /// the procedures in this process.
    #[arg(long, global = true, env = "POCKETCHAT_SERVER_URL")]
    pub server_url: Option<String>,

    /// Bearer token sent with every procedure call.
    #[arg(long, global = true, env = "POCKETCHAT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the RPC server.
    Serve {
        /// Interface to bind (overrides `server.host`).
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides `server.port`).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send one message and print the reply.
    ///
    /// Start the message with "generate image:" to request an image.
    Send {
        /// Message text (joined with spaces).
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },

    /// Show recent messages, oldest first.
    #[command(alias = "log")]
    History {
        /// How many messages to show.
        #[arg(short = 'n', long, default_value_t = DEFAULT_HISTORY_LIMIT,
              value_parser = clap::value_parser!(u32).range(1..=MAX_HISTORY_LIMIT as i64))]
        limit: u32,
    },

    /// Start an interactive chat.
    Chat {
        /// How many past messages to load.
        #[arg(short = 'n', long, default_value_t = DEFAULT_HISTORY_LIMIT,
              value_parser = clap::value_parser!(u32).range(1..=MAX_HISTORY_LIMIT as i64))]
        limit: u32,
    },
}

impl Commands {
    pub fn is_server(&self) -> bool {
        matches!(self, Commands::Serve { .. })
    }
}
