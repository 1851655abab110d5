//! One-shot question: `kafra ask <message>`.

use console::style;

use kafra_core::chat::dispatcher::ChatDispatcher;

use super::chat::display;

/// Send one message with no history and print the reply.
pub async fn ask(dispatcher: &ChatDispatcher, message: &str, json: bool) -> anyhow::Result<()> {
    let spinner = (!json).then(display::thinking_spinner);
    let reply = dispatcher.respond(message, &[]).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    println!();
    println!("  {}", reply.text);
    println!();
    println!("  {}", style(display::source_label(&reply.source)).dim());
    Ok(())
}
