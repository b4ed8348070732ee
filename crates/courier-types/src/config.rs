//! Relay configuration.
//!
//! `CourierConfig` represents the top-level `config.toml` controlling
//! history bounds, the completion timeout, credential probing, and the
//! upstream base URL. All fields have defaults so a missing file works.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Courier relay.
///
/// Loaded from `{data_dir}/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierConfig {
    /// Maximum stored history entries per user; oldest evicted first.
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,

    /// Maximum history entries included in an upstream prompt.
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,

    /// Upper bound on a single completion call, in seconds.
    #[serde(default = "default_completion_timeout_secs")]
    pub completion_timeout_secs: u64,

    /// Whether a newly supplied credential is probed against the upstream
    /// service before being accepted (in addition to the syntax check).
    #[serde(default = "default_probe_credential")]
    pub probe_credential: bool,

    /// Base URL of the OpenAI-compatible completion service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_history_cap() -> usize {
    100
}

fn default_context_turns() -> usize {
    20
}

fn default_completion_timeout_secs() -> u64 {
    60
}

fn default_probe_credential() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            history_cap: default_history_cap(),
            context_turns: default_context_turns(),
            completion_timeout_secs: default_completion_timeout_secs(),
            probe_credential: default_probe_credential(),
            base_url: default_base_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = CourierConfig::default();
        assert_eq!(config.history_cap, 100);
        assert_eq!(config.context_turns, 20);
        assert_eq!(config.completion_timeout_secs, 60);
        assert!(config.probe_credential);
        assert_eq!(config.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let config: CourierConfig = toml::from_str("").unwrap();
        assert_eq!(config.history_cap, 100);
        assert!(config.probe_credential);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: CourierConfig = toml::from_str(
            r#"
context_turns = 8
probe_credential = false
base_url = "http://localhost:8080/v1"
"#,
        )
        .unwrap();
        assert_eq!(config.context_turns, 8);
        assert!(!config.probe_credential);
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        // untouched fields keep defaults
        assert_eq!(config.history_cap, 100);
    }
}
