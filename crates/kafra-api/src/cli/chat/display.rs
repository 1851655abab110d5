//! Terminal rendering for the chat loop and `kafra ask`.
//!
//! Everything writes to a caller-supplied `Write` so the chat loop can
//! print through the readline writer without corrupting the prompt.

use std::io::{self, Write};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use kafra_core::chat::dispatcher::{DispatcherStatus, Reply, ReplySource};
use kafra_types::chat::{ChatMessage, Sender};

const BOT_NAME: &str = "Kafra";
const PREVIEW_CHARS: usize = 100;

/// Welcome banner with the configured backends.
pub fn print_banner(out: &mut impl Write, status: &DispatcherStatus) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", style(BOT_NAME).magenta().bold())?;
    writeln!(out, "  {}", style("ผู้ช่วยประจำบล็อก hh.").dim())?;
    writeln!(out)?;
    writeln!(
        out,
        "  {}  {}",
        style("Primary:").bold(),
        style(status.primary.as_deref().unwrap_or("none")).dim()
    )?;
    writeln!(
        out,
        "  {}  {}",
        style("Secondary:").bold(),
        style(status.secondary.as_deref().unwrap_or("none")).dim()
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    )?;
    writeln!(out, "  {}", style("---").dim())?;
    writeln!(out)
}

pub fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.magenta} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message("Kafra กำลังพิมพ์...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Short label for where a reply came from.
pub fn source_label(source: &ReplySource) -> String {
    match source {
        ReplySource::Primary { provider } => format!("via {provider}"),
        ReplySource::Secondary { provider } => format!("via {provider} (secondary)"),
        ReplySource::Fallback {
            category,
            provider_disabled: true,
        } => format!("offline reply [{category}], providers disabled"),
        ReplySource::Fallback { category, .. } => format!("offline reply [{category}]"),
        ReplySource::Busy { category } => format!("busy [{category}]"),
        ReplySource::Offline { category } => format!("no backend [{category}]"),
    }
}

pub fn print_reply(out: &mut impl Write, reply: &Reply, verbose: bool) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {} {}", style(format!("{BOT_NAME} >")).magenta().bold(), reply.text)?;
    if verbose || !reply.source.is_remote() {
        writeln!(out, "  {}", style(source_label(&reply.source)).dim())?;
    }
    writeln!(out)
}

pub fn print_status(out: &mut impl Write, status: &DispatcherStatus) -> io::Result<()> {
    let gate = &status.gate;
    let health = if gate.provider_disabled {
        style("disabled").red().bold()
    } else {
        style("ok").green()
    };
    let last = gate
        .last_request_ago_ms
        .map(|ms| format!("{ms} ms ago"))
        .unwrap_or_else(|| "never".to_string());

    writeln!(out)?;
    writeln!(out, "  {}", style("Dispatcher status").bold())?;
    writeln!(
        out,
        "  Backends:      {} / {}",
        status.primary.as_deref().unwrap_or("none"),
        status.secondary.as_deref().unwrap_or("none")
    )?;
    writeln!(out, "  Secondary:     {health}")?;
    writeln!(
        out,
        "  Errors:        {}/{}",
        gate.consecutive_errors, gate.max_consecutive_errors
    )?;
    writeln!(out, "  Min interval:  {} ms", gate.min_interval_ms)?;
    writeln!(out, "  Last request:  {last}")?;
    writeln!(out, "  In flight:     {}", status.in_flight)?;
    writeln!(out)
}

pub fn print_history(out: &mut impl Write, messages: &[ChatMessage]) -> io::Result<()> {
    writeln!(out)?;
    if messages.is_empty() {
        writeln!(out, "  {}", style("No messages yet.").dim())?;
    }
    for msg in messages {
        let label = match msg.sender {
            Sender::User => style("You").green().bold(),
            Sender::Bot => style(BOT_NAME).magenta().bold(),
        };
        writeln!(
            out,
            "  {} {} {}",
            style(msg.timestamp.format("%H:%M")).dim(),
            label,
            preview(&msg.text)
        )?;
    }
    writeln!(out)
}

/// First line of `text`, cut at a character boundary.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > PREVIEW_CHARS || line.len() < text.trim_end().len() {
        let cut: String = line.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}
