//! Interactive chat loop for the console transport.
//!
//! A single local user identity talking to the relay through stdin.
//! Replies are printed between readline awaits, so plain println is safe
//! alongside the async prompt.

use console::style;
use rustyline_async::{Readline, ReadlineEvent};

use courier_core::transport::Transport;
use courier_types::error::TransportError;
use courier_types::user::UserId;

use crate::state::AppState;

use super::commands::{self, ParsedLine};

/// Transport that prints replies to the terminal.
struct ConsoleTransport;

impl Transport for ConsoleTransport {
    async fn send(&self, _user_id: &UserId, text: &str) -> Result<(), TransportError> {
        println!("  {} {}", style("courier >").cyan().bold(), text);
        Ok(())
    }
}

fn print_banner(user: &str) {
    println!();
    println!(
        "  {} chatting as {}",
        style("courier").cyan().bold(),
        style(user).green()
    );
    println!(
        "  {}",
        style("/help for commands, /exit or Ctrl+D to leave").dim()
    );
    println!();
}

/// Run the interactive chat loop for one user identity.
pub async fn run_chat_loop(state: &AppState, user: &str) -> anyhow::Result<()> {
    let user_id = UserId::from(user);
    print_banner(user);

    let prompt = format!("  {} ", style("you >").green().bold());
    let (mut rl, _writer) =
        Readline::new(prompt).map_err(|e| anyhow::anyhow!("failed to initialize input: {e}"))?;
    let transport = ConsoleTransport;

    loop {
        match rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line.clone());
                match commands::parse(&user_id, &line) {
                    ParsedLine::Exit => break,
                    ParsedLine::Inbound(inbound) => {
                        state.relay.handle(&transport, inbound).await;
                    }
                }
            }
            Ok(ReadlineEvent::Eof) => break,
            Ok(ReadlineEvent::Interrupted) => {
                println!(
                    "\n  {}",
                    style("Ctrl+D or /exit to leave, or keep chatting.").dim()
                );
                continue;
            }
            Err(_) => break,
        }
    }

    println!("\n  {}", style("Session ended.").dim());
    Ok(())
}
