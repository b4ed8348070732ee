//! Logical command surface.
//!
//! The transport parses its native syntax (e.g. `/params temperature 0.8`)
//! into a verb plus arguments; this module maps that raw form onto the
//! commands the core understands. Unrecognized verbs stay visible as
//! `Unknown` so the state machine can answer with help instead of
//! silently dropping them.

use serde::{Deserialize, Serialize};

use courier_types::user::UserId;

/// One inbound message as delivered by the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inbound {
    pub user_id: UserId,
    /// Full message text (command messages included).
    pub text: String,
    /// Present when the transport recognized the message as a command.
    pub command: Option<RawCommand>,
}

impl Inbound {
    /// A plain chat message.
    pub fn text(user_id: impl Into<UserId>, text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
            command: None,
        }
    }

    /// A command message with pre-split arguments.
    pub fn command(
        user_id: impl Into<UserId>,
        verb: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        let verb = verb.into();
        let text = if args.is_empty() {
            verb.clone()
        } else {
            format!("{verb} {}", args.join(" "))
        };
        Self {
            user_id: user_id.into(),
            text,
            command: Some(RawCommand { verb, args }),
        }
    }
}

/// Verb + arguments as split by the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCommand {
    pub verb: String,
    pub args: Vec<String>,
}

/// Commands the core understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Help,
    SetCredential,
    Reset,
    Params(ParamsArgs),
    SetLanguage,
    Unknown(String),
}

/// Argument shapes of the `params` command.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamsArgs {
    /// `params` -- render current settings.
    Show,
    /// `params <name>` -- prompt for a value for one option.
    Prompt { name: String },
    /// `params <name> <value>` -- single-shot edit.
    Set { name: String, value: String },
}

impl Command {
    /// Map a transport-level `(verb, args)` pair onto the command surface.
    pub fn from_raw(raw: &RawCommand) -> Self {
        match raw.verb.to_lowercase().as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "set-credential" => Command::SetCredential,
            "reset" => Command::Reset,
            "set-language" => Command::SetLanguage,
            "params" => match raw.args.as_slice() {
                [] => Command::Params(ParamsArgs::Show),
                [name] => Command::Params(ParamsArgs::Prompt { name: name.clone() }),
                [name, value, ..] => Command::Params(ParamsArgs::Set {
                    name: name.clone(),
                    value: value.clone(),
                }),
            },
            other => Command::Unknown(other.to_string()),
        }
    }
}
