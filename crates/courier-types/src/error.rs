use thiserror::Error;

/// Errors from validating user-supplied input (commands, credentials,
/// parameter edits, language picks).
///
/// Each variant names the specific violated constraint so the reply to the
/// user can say exactly what was wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("credential must not be empty")]
    EmptyCredential,

    #[error("credential does not look like an API key")]
    MalformedCredential,

    #[error("unknown parameter: '{0}'")]
    UnknownParam(String),

    #[error("invalid value for '{name}': {reason}")]
    InvalidParamValue { name: String, reason: String },

    #[error("unsupported language: '{0}'")]
    UnsupportedLanguage(String),
}

/// Errors from the external completion service.
///
/// Categories are coarse on purpose: the user gets one
/// category-appropriate message, and the turn's history mutation is
/// discarded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpstreamError {
    #[error("authentication rejected by the completion service")]
    Auth,

    #[error("completion service rate limit exceeded")]
    RateLimited,

    #[error("completion request timed out")]
    Timeout,

    #[error("completion service error: {0}")]
    Other(String),
}

/// Errors from repository operations (used by trait definitions in courier-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors from delivering an outbound message through the transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("send failed: {0}")]
    Send(String),
}
