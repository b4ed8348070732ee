//! User record, session state, and language types for Courier.
//!
//! A `UserRecord` is the unit of persistence: one per chat identity,
//! created lazily on first contact, mutated only inside a dispatcher turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::params::ChatParams;
use crate::secret::Redacted;

// Re-export MessageRole from the llm module (history entries and prompt
// messages share the same role vocabulary).
pub use crate::llm::MessageRole;

/// Stable external identifier for a chat user, as assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Reply language for a user.
///
/// The supported set matches the catalog; unknown selections are rejected,
/// and languages without a full catalog fall back to English at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
    Ru,
    Es,
    Fr,
    De,
    Ja,
    Ko,
}

impl Language {
    /// All supported languages, in menu order.
    pub const ALL: [Language; 8] = [
        Language::En,
        Language::Zh,
        Language::Ru,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::Ja,
        Language::Ko,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
            Language::Ru => "ru",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Ja => "ja",
            Language::Ko => "ko",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            "ru" => Ok(Language::Ru),
            "es" => Ok(Language::Es),
            "fr" => Ok(Language::Fr),
            "de" => Ok(Language::De),
            "ja" => Ok(Language::Ja),
            "ko" => Ok(Language::Ko),
            other => Err(format!("unsupported language: '{other}'")),
        }
    }
}

/// Session-machine state of a user.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (state IN ('idle', 'awaiting_credential', 'awaiting_param_value', 'awaiting_language'))`
/// with the pending parameter name in a separate nullable column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionState {
    /// Plain chat; commands interpreted normally.
    Idle,
    /// The next free-text message is a credential value.
    AwaitingCredential,
    /// The next free-text message is the value for a pending parameter edit.
    AwaitingParamValue { name: String },
    /// The next message is a language selection.
    AwaitingLanguage,
}

impl SessionState {
    /// Tag persisted in the `state` column.
    pub fn tag(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingCredential => "awaiting_credential",
            SessionState::AwaitingParamValue { .. } => "awaiting_param_value",
            SessionState::AwaitingLanguage => "awaiting_language",
        }
    }

    /// Pending parameter name persisted in the `pending_param` column.
    pub fn pending_param(&self) -> Option<&str> {
        match self {
            SessionState::AwaitingParamValue { name } => Some(name),
            _ => None,
        }
    }

    /// Reassemble a state from its persisted columns.
    pub fn from_columns(tag: &str, pending_param: Option<String>) -> Result<Self, String> {
        match tag {
            "idle" => Ok(SessionState::Idle),
            "awaiting_credential" => Ok(SessionState::AwaitingCredential),
            "awaiting_param_value" => {
                let name = pending_param
                    .ok_or_else(|| "awaiting_param_value without pending_param".to_string())?;
                Ok(SessionState::AwaitingParamValue { name })
            }
            "awaiting_language" => Ok(SessionState::AwaitingLanguage),
            other => Err(format!("invalid session state: '{other}'")),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One entry in a user's conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Durable per-user state: credential, language, parameters, session-machine
/// state, and the bounded conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,
    /// Upstream credential; absent until set, redacted in all output.
    pub credential: Option<Redacted>,
    pub language: Language,
    pub params: ChatParams,
    pub state: SessionState,
    /// Ordered oldest-first; bounded by the configured history cap.
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// A fresh default record, as created lazily on first contact.
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            credential: None,
            language: Language::default(),
            params: ChatParams::default(),
            state: SessionState::default(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.as_ref().is_some_and(|c| !c.is_empty())
    }
}
