//! CLI command definitions for the `kafra` binary.
//!
//! `serve` runs the chat proxy; `chat` and `ask` talk to it through the
//! client-side dispatcher, which falls back to a secondary provider and
//! then to canned replies.

pub mod ask;
pub mod chat;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use kafra_core::chat::dispatcher::{ChatDispatcher, DispatcherConfig};
use kafra_infra::llm::{create_primary, create_provider};
use kafra_infra::secret::Secrets;
use kafra_types::config::KafraConfig;

/// Kafra, the blog assistant: chat proxy server and terminal client.
#[derive(Parser)]
#[command(name = "kafra", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config.toml (defaults to ~/.kafra/config.toml).
    #[arg(long, global = true, env = "KAFRA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat proxy server.
    Serve {
        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config and PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Interactive chat with Kafra.
    Chat,

    /// Ask a single question and print the reply.
    Ask {
        /// The question; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Assemble the client dispatcher from configuration and resolved keys.
///
/// A backend that cannot be built is logged and left out; with neither
/// backend the dispatcher answers from the fallback table only.
pub fn build_dispatcher(config: &KafraConfig, secrets: &Secrets) -> ChatDispatcher {
    let client = &config.client;
    let mut dispatcher_config = DispatcherConfig::from(client);
    dispatcher_config.system_prompt = Some(config.server.system_prompt.clone());

    let mut dispatcher = ChatDispatcher::new(dispatcher_config);

    if let Some(url) = client.api_url.as_deref() {
        match create_primary(url) {
            Ok(primary) => dispatcher = dispatcher.with_primary(primary),
            Err(err) => tracing::warn!(api_url = url, error = %err, "Primary backend unavailable"),
        }
    }

    match create_provider(
        client.secondary_provider,
        &client.secondary_model,
        secrets.for_provider(client.secondary_provider),
    ) {
        Ok(secondary) => dispatcher = dispatcher.with_secondary(secondary),
        Err(err) => tracing::debug!(
            provider = ?client.secondary_provider,
            error = %err,
            "Secondary provider not configured"
        ),
    }

    dispatcher
}
