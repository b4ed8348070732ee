//! The per-user session state machine.
//!
//! [`step`] is a pure function from the user's current record and one
//! inbound message to the [`Step`] the turn engine must execute. All
//! interpretation lives here -- including the implicit-cancel edge policy
//! for commands arriving mid-flow -- so the transition table is testable
//! without any IO.
//!
//! Invariant: a command is never silently discarded. Mid-flow it cancels
//! the pending flow and is interpreted against `Idle` rules; `help` and
//! `start` are informational in every state and leave the flow pending.

use courier_types::error::ValidationError;
use courier_types::user::{SessionState, UserRecord};

use super::command::{Command, Inbound, ParamsArgs};

/// What the turn engine must do for one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// `start`: greet; when no credential is on file, also prompt for one
    /// and enter `AwaitingCredential`.
    Greet,
    /// `help`: informational, no state change.
    Help,
    /// Unrecognized command: answer with help, no state change.
    UnknownCommand,
    /// `set-credential`: prompt for the secret, enter `AwaitingCredential`.
    PromptCredential,
    /// Free text while `AwaitingCredential`: validate and store it.
    AcceptCredential(String),
    /// `reset`: clear history only.
    ResetHistory,
    /// `params`: render current settings.
    ShowParams,
    /// `params <name> <value>`: single-shot edit.
    EditParam { name: String, value: String },
    /// `params <name>`: prompt for a value, enter `AwaitingParamValue`.
    PromptParamValue { name: String },
    /// Free text while `AwaitingParamValue`: apply it to the pending option.
    AcceptParamValue { name: String, value: String },
    /// `set-language`: present the menu, enter `AwaitingLanguage`.
    PromptLanguage,
    /// Selection while `AwaitingLanguage`.
    SelectLanguage(String),
    /// Plain chat text while `Idle`.
    Chat(String),
}

impl Step {
    /// Discriminant name for logging. Never includes the message text:
    /// an `AcceptCredential` payload is the secret itself.
    pub fn label(&self) -> &'static str {
        match self {
            Step::Greet => "greet",
            Step::Help => "help",
            Step::UnknownCommand => "unknown_command",
            Step::PromptCredential => "prompt_credential",
            Step::AcceptCredential(_) => "accept_credential",
            Step::ResetHistory => "reset_history",
            Step::ShowParams => "show_params",
            Step::EditParam { .. } => "edit_param",
            Step::PromptParamValue { .. } => "prompt_param_value",
            Step::AcceptParamValue { .. } => "accept_param_value",
            Step::PromptLanguage => "prompt_language",
            Step::SelectLanguage(_) => "select_language",
            Step::Chat(_) => "chat",
        }
    }
}

/// Interpret one inbound message against the user's current state.
pub fn step(record: &UserRecord, inbound: &Inbound) -> Step {
    if let Some(raw) = &inbound.command {
        // Commands win in every state. Anything that is not purely
        // informational implicitly cancels a pending flow; the turn
        // engine persists the reversion to Idle.
        return match Command::from_raw(raw) {
            Command::Start => Step::Greet,
            Command::Help => Step::Help,
            Command::SetCredential => Step::PromptCredential,
            Command::Reset => Step::ResetHistory,
            Command::SetLanguage => Step::PromptLanguage,
            Command::Params(ParamsArgs::Show) => Step::ShowParams,
            Command::Params(ParamsArgs::Prompt { name }) => Step::PromptParamValue { name },
            Command::Params(ParamsArgs::Set { name, value }) => Step::EditParam { name, value },
            Command::Unknown(_) => Step::UnknownCommand,
        };
    }

    match &record.state {
        SessionState::Idle => Step::Chat(inbound.text.clone()),
        SessionState::AwaitingCredential => Step::AcceptCredential(inbound.text.clone()),
        SessionState::AwaitingParamValue { name } => Step::AcceptParamValue {
            name: name.clone(),
            value: inbound.text.clone(),
        },
        SessionState::AwaitingLanguage => Step::SelectLanguage(inbound.text.clone()),
    }
}

/// Syntactic credential check: non-empty, no whitespace, a plausible
/// API-key length, printable ASCII. The live probe (when enabled) is the
/// upstream client's job.
pub fn validate_credential_shape(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyCredential);
    }
    let plausible = value.len() >= 20
        && value.is_ascii()
        && !value.chars().any(|c| c.is_whitespace() || c.is_control());
    if !plausible {
        return Err(ValidationError::MalformedCredential);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_types::user::{UserId, UserRecord};

    use crate::session::command::Inbound;

    fn record_in(state: SessionState) -> UserRecord {
        let mut record = UserRecord::new(UserId::from("42"));
        record.state = state;
        record
    }

    fn cmd(verb: &str, args: &[&str]) -> Inbound {
        Inbound::command("42", verb, args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_idle_plain_text_is_chat() {
        let record = record_in(SessionState::Idle);
        let step = step(&record, &Inbound::text("42", "hello there"));
        assert_eq!(step, Step::Chat("hello there".to_string()));
    }

    #[test]
    fn test_idle_commands() {
        let record = record_in(SessionState::Idle);
        assert_eq!(step(&record, &cmd("start", &[])), Step::Greet);
        assert_eq!(step(&record, &cmd("help", &[])), Step::Help);
        assert_eq!(step(&record, &cmd("set-credential", &[])), Step::PromptCredential);
        assert_eq!(step(&record, &cmd("reset", &[])), Step::ResetHistory);
        assert_eq!(step(&record, &cmd("params", &[])), Step::ShowParams);
        assert_eq!(step(&record, &cmd("set-language", &[])), Step::PromptLanguage);
    }

    #[test]
    fn test_params_with_args() {
        let record = record_in(SessionState::Idle);
        assert_eq!(
            step(&record, &cmd("params", &["temperature", "0.8"])),
            Step::EditParam {
                name: "temperature".to_string(),
                value: "0.8".to_string()
            }
        );
        assert_eq!(
            step(&record, &cmd("params", &["top_p"])),
            Step::PromptParamValue {
                name: "top_p".to_string()
            }
        );
    }

    #[test]
    fn test_awaiting_credential_free_text_is_the_secret() {
        let record = record_in(SessionState::AwaitingCredential);
        let step = step(&record, &Inbound::text("42", "sk-proj-abcdef0123456789abcdef"));
        assert_eq!(
            step,
            Step::AcceptCredential("sk-proj-abcdef0123456789abcdef".to_string())
        );
    }

    #[test]
    fn test_command_mid_flow_cancels_and_executes() {
        // A command during credential entry is never treated as the secret.
        let record = record_in(SessionState::AwaitingCredential);
        assert_eq!(step(&record, &cmd("reset", &[])), Step::ResetHistory);

        let record = record_in(SessionState::AwaitingLanguage);
        assert_eq!(step(&record, &cmd("set-credential", &[])), Step::PromptCredential);
    }

    #[test]
    fn test_help_and_start_informational_in_every_state() {
        for state in [
            SessionState::Idle,
            SessionState::AwaitingCredential,
            SessionState::AwaitingParamValue {
                name: "top_p".to_string(),
            },
            SessionState::AwaitingLanguage,
        ] {
            let record = record_in(state);
            assert_eq!(step(&record, &cmd("help", &[])), Step::Help);
            assert_eq!(step(&record, &cmd("start", &[])), Step::Greet);
        }
    }

    #[test]
    fn test_awaiting_param_value_free_text_is_the_value() {
        let record = record_in(SessionState::AwaitingParamValue {
            name: "temperature".to_string(),
        });
        assert_eq!(
            step(&record, &Inbound::text("42", "0.9")),
            Step::AcceptParamValue {
                name: "temperature".to_string(),
                value: "0.9".to_string()
            }
        );
    }

    #[test]
    fn test_awaiting_language_free_text_is_the_selection() {
        let record = record_in(SessionState::AwaitingLanguage);
        assert_eq!(
            step(&record, &Inbound::text("42", "de")),
            Step::SelectLanguage("de".to_string())
        );
    }

    #[test]
    fn test_unknown_command_yields_help_step() {
        let record = record_in(SessionState::Idle);
        assert_eq!(step(&record, &cmd("frobnicate", &[])), Step::UnknownCommand);
    }

    #[test]
    fn test_credential_shape() {
        assert!(validate_credential_shape("sk-proj-abcdef0123456789abcdef").is_ok());
        assert_eq!(
            validate_credential_shape(""),
            Err(ValidationError::EmptyCredential)
        );
        assert_eq!(
            validate_credential_shape("short"),
            Err(ValidationError::MalformedCredential)
        );
        assert_eq!(
            validate_credential_shape("sk-proj with spaces inside it"),
            Err(ValidationError::MalformedCredential)
        );
        assert_eq!(
            validate_credential_shape("sk-ключ-не-ascii-0123456789"),
            Err(ValidationError::MalformedCredential)
        );
    }
}
