//! Console-syntax command parsing.
//!
//! The console transport uses Telegram-style slash commands and maps them
//! onto the core's logical command surface. Anything not starting with
//! `/` is plain chat text. Unknown slash verbs are still delivered as
//! commands so the core can answer with help.

use courier_core::session::Inbound;
use courier_types::user::UserId;

/// Result of parsing one console line.
#[derive(Debug)]
pub enum ParsedLine {
    /// Deliver this to the relay.
    Inbound(Inbound),
    /// Leave the chat loop.
    Exit,
}

/// Parse one line of console input for the given user identity.
pub fn parse(user_id: &UserId, line: &str) -> ParsedLine {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ParsedLine::Inbound(Inbound::text(user_id.clone(), trimmed));
    };

    let mut parts = rest.split_whitespace();
    let verb = parts.next().unwrap_or("").to_lowercase();
    let args: Vec<String> = parts.map(str::to_string).collect();

    // Console aliases for the logical verbs.
    let verb = match verb.as_str() {
        "exit" | "quit" | "q" => return ParsedLine::Exit,
        "key" | "setapi" => "set-credential",
        "lang" | "setlang" => "set-language",
        other => other,
    };

    ParsedLine::Inbound(Inbound::command(user_id.clone(), verb, args))
}
