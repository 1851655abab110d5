//! Slash commands for the chat loop.

use std::io::{self, Write};

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Re-enable remote providers after repeated failures.
    Reset,
    Status,
    History,
    /// Forget the conversation and clear the screen.
    Clear,
    Exit,
    Unknown(String),
}

/// Parse input as a slash command; `None` when it is a normal message.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    let parsed = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/reset" => ChatCommand::Reset,
        "/status" => ChatCommand::Status,
        "/history" => ChatCommand::History,
        "/clear" | "/cls" | "/new" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        _ => ChatCommand::Unknown(cmd),
    };
    Some(parsed)
}

pub fn print_help(out: &mut impl Write) -> io::Result<()> {
    let rows = [
        ("/help", "Show this help message"),
        ("/status", "Show backends and error counter"),
        ("/reset", "Re-enable AI providers after repeated failures"),
        ("/history", "Show this conversation"),
        ("/clear", "Forget the conversation and clear the screen"),
        ("/exit", "End the chat session"),
    ];

    writeln!(out)?;
    writeln!(out, "  {}", style("Available commands:").bold())?;
    writeln!(out)?;
    for (name, help) in rows {
        writeln!(out, "  {:<10} {help}", style(name).cyan())?;
    }
    writeln!(out)?;
    writeln!(out, "  {}", style("Ctrl+D to exit").dim())?;
    writeln!(out)
}
