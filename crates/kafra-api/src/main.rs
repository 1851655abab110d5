//! Kafra chat proxy and terminal client.
//!
//! Binary name: `kafra`
//!
//! Parses CLI arguments, loads configuration, then either serves the chat
//! API or runs the client-side dispatcher.

mod cli;
mod http;
mod state;

use std::net::SocketAddr;

use clap::Parser;
use clap_complete::generate;
use tokio_util::sync::CancellationToken;

use kafra_infra::config::load_config;
use kafra_infra::secret::Secrets;
use kafra_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
use kafra_types::config::{KafraConfig, ServerConfig};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or logging
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "kafra", &mut std::io::stdout());
        return Ok(());
    }

    let options = TracingOptions::for_verbosity(cli.verbose, cli.quiet)
        .with_json(cli.log_json)
        .with_otel(cli.otel);
    init_tracing(&options).map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let config = load_config(cli.config.as_deref()).await?;
    let secrets = Secrets::from_env();

    let result = run(cli, config, secrets).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, config: KafraConfig, secrets: Secrets) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { host, port } => {
            let mut server = config.server;
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            serve(server, &secrets, cli.quiet).await?;
        }

        Commands::Chat => {
            let dispatcher = cli::build_dispatcher(&config, &secrets);
            cli::chat::loop_runner::run_chat_loop(&dispatcher, cli.verbose > 0).await?;
        }

        Commands::Ask { message } => {
            let dispatcher = cli::build_dispatcher(&config, &secrets);
            cli::ask::ask(&dispatcher, &message.join(" "), cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

async fn serve(config: ServerConfig, secrets: &Secrets, quiet: bool) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let state = AppState::from_config(config, secrets);
    let cancel = CancellationToken::new();
    let sweeper = http::rate_limit::spawn_sweeper(
        state.limiter.clone(),
        state.config.rate_limit.sweep_interval(),
        cancel.clone(),
    );

    tracing::info!(
        addr = %addr,
        model = %state.config.model,
        window_secs = state.config.rate_limit.window_secs,
        max_requests = state.config.rate_limit.max_requests,
        "Kafra chat server starting"
    );
    if !quiet {
        println!(
            "  {} Kafra API listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let router = http::router::build_router(state);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    cancel.cancel();
    let _ = sweeper.await;

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
