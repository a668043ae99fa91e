//! PocketChat CLI and RPC server entry point.
//!
//! Binary name: `pchat`
//!
//! Parses CLI arguments, sets up tracing, then either starts the RPC server
//! or runs a client command against a remote server or in-process
//! procedures.

mod cli;
mod http;
mod state;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use secrecy::SecretString;

use pocketchat_core::client::{ChatSession, InProcessCaller};
use pocketchat_core::context::{ContextFactory, PlaceholderIdentityResolver};
use pocketchat_core::procedure::Procedures;
use pocketchat_infra::config::load_app_config;
use pocketchat_infra::rpc_client::HttpProcedureCaller;
use pocketchat_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
use pocketchat_types::procedure::DEFAULT_HISTORY_LIMIT;

use cli::chat::banner::Backend;
use cli::chat::caller::ClientCaller;
use cli::{Cli, Commands};
use state::AppState;

/// Token the in-process client presents when `--token` is not given.
const LOCAL_TOKEN: &str = "local-cli";

/// Remote calls may wait on image generation.
const REMOTE_TIMEOUT: Duration = Duration::from_secs(150);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.command.is_server() => "warn,pocketchat=info,tower_http=info",
        0 => "warn",
        1 => "info",
        2 => "debug,hyper=info",
        _ => "trace",
    };
    let options = TracingOptions::new(filter)
        .with_json(cli.log_json)
        .with_otel(cli.otel);
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Serve { host, port } => {
            let config = load_app_config(cli.config.as_deref()).await?;
            let state = AppState::init(&config).await?;

            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            println!(
                "  {} PocketChat listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!(
                "  {}",
                console::style(format!(
                    "persistence: {}, provider: {}",
                    state.backend(),
                    state.provider_name()
                ))
                .dim()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Send { message } => {
            let (mut session, _) = open_session(&cli, DEFAULT_HISTORY_LIMIT).await?;
            cli::chat::oneshot::send(&mut session, &message.join(" "), cli.json).await?;
        }

        Commands::History { limit } => {
            let (mut session, _) = open_session(&cli, *limit).await?;
            cli::chat::oneshot::history(&mut session, cli.json).await?;
        }

        Commands::Chat { limit } => {
            let (mut session, backend) = open_session(&cli, *limit).await?;
            cli::chat::loop_runner::run_chat_loop(&mut session, &backend).await?;
        }
    }

    Ok(())
}

/// Build a `ChatSession` over the right caller.
///
/// With `--server-url`, calls go over HTTP and no local config is needed.
/// Otherwise the config is loaded (the AI key is required) and procedures
/// run in this process under the identity the token resolves to.
async fn open_session(
    cli: &Cli,
    history_limit: u32,
) -> anyhow::Result<(ChatSession<ClientCaller>, Backend)> {
    if let Some(url) = cli.server_url.as_deref() {
        let token = cli.token.clone().map(SecretString::from);
        let caller = HttpProcedureCaller::new(url, token, REMOTE_TIMEOUT)?;
        let backend = Backend::Remote {
            url: url.to_string(),
        };
        return Ok((
            ChatSession::new(ClientCaller::Remote(caller), history_limit),
            backend,
        ));
    }

    let config = load_app_config(cli.config.as_deref()).await?;
    let (repository, provider) = state::build_adapters(&config).await?;
    let backend = Backend::Local {
        persistence: repository.backend(),
    };

    let contexts = ContextFactory::new(
        repository,
        PlaceholderIdentityResolver::new(config.auth.placeholder_subject.as_str()),
    );
    let header = format!("Bearer {}", cli.token.as_deref().unwrap_or(LOCAL_TOKEN));
    let ctx = contexts.create(Some(&header)).await;

    let caller = InProcessCaller::new(Procedures::new(provider), ctx);
    Ok((
        ChatSession::new(ClientCaller::Local(caller), history_limit),
        backend,
    ))
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
