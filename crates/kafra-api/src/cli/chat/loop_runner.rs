//! Main chat loop.
//!
//! Reads lines, handles slash commands, and sends everything else through
//! the dispatcher with the session history.

use std::io::Write;

use console::style;

use kafra_core::chat::dispatcher::ChatDispatcher;
use kafra_core::chat::session::ChatSession;

use super::commands::{self, ChatCommand};
use super::display;
use super::input::{ChatInput, InputEvent};

/// Run an interactive session until Ctrl+D or `/exit`.
pub async fn run_chat_loop(dispatcher: &ChatDispatcher, verbose: bool) -> anyhow::Result<()> {
    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut input, mut out) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let mut session = ChatSession::new();
    display::print_banner(&mut out, &dispatcher.status())?;

    loop {
        let text = match input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                writeln!(out, "  {}", style("Press Ctrl+D to exit, or keep chatting.").dim())?;
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(&mut out)?,
                ChatCommand::Reset => {
                    dispatcher.reset();
                    writeln!(
                        out,
                        "\n  {} AI providers re-enabled.\n",
                        style("*").magenta().bold()
                    )?;
                }
                ChatCommand::Status => display::print_status(&mut out, &dispatcher.status())?,
                ChatCommand::History => display::print_history(&mut out, session.history())?,
                ChatCommand::Clear => {
                    session.clear();
                    input.clear();
                }
                ChatCommand::Exit => break,
                ChatCommand::Unknown(name) => writeln!(
                    out,
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(name).dim()
                )?,
            }
            continue;
        }

        let spinner = display::thinking_spinner();
        let (_, reply) = session.send(dispatcher, &text).await;
        spinner.finish_and_clear();

        tracing::debug!(source = ?reply.source, turns = session.user_turns(), "Reply rendered");
        display::print_reply(&mut out, &reply, verbose)?;
    }

    writeln!(out, "\n  {}", style("Session ended.").dim())?;
    input.flush();
    Ok(())
}
