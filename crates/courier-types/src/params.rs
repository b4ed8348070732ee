//! User-tunable completion parameters.
//!
//! Every recognized option has a typed field with a default, a parse rule,
//! and a range constraint. Edits go through [`ChatParams::set`], which
//! reports the exact violated constraint on failure so the reply to the
//! user can name it.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Names of the recognized options, in display order.
pub const OPTION_NAMES: [&str; 6] = [
    "model",
    "temperature",
    "max_tokens",
    "top_p",
    "frequency_penalty",
    "presence_penalty",
];

/// Per-user completion parameters, merged over the defaults.
///
/// Persisted as a JSON column on the user record; `#[serde(default)]` on
/// each field keeps records written before an option existed loadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatParams {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_penalty")]
    pub frequency_penalty: f64,
    #[serde(default = "default_penalty")]
    pub presence_penalty: f64,
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_top_p() -> f64 {
    1.0
}

fn default_penalty() -> f64 {
    0.0
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            frequency_penalty: default_penalty(),
            presence_penalty: default_penalty(),
        }
    }
}

impl ChatParams {
    /// Whether `name` is a recognized option.
    pub fn is_recognized(name: &str) -> bool {
        OPTION_NAMES.contains(&name)
    }

    /// Set a single option from its textual value.
    ///
    /// On failure the params are left unchanged and the error names the
    /// violated constraint.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ValidationError> {
        match name {
            "model" => {
                if value.trim().is_empty() {
                    return Err(invalid(name, "model name must not be empty"));
                }
                self.model = value.trim().to_string();
            }
            "temperature" => {
                self.temperature =
                    parse_ranged_f64(name, value, 0.0, 2.0)?;
            }
            "max_tokens" => {
                let parsed: u32 = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(name, "expected a positive integer"))?;
                if parsed == 0 {
                    return Err(invalid(name, "expected a positive integer"));
                }
                self.max_tokens = parsed;
            }
            "top_p" => {
                self.top_p = parse_ranged_f64(name, value, 0.0, 1.0)?;
            }
            "frequency_penalty" => {
                self.frequency_penalty = parse_ranged_f64(name, value, -2.0, 2.0)?;
            }
            "presence_penalty" => {
                self.presence_penalty = parse_ranged_f64(name, value, -2.0, 2.0)?;
            }
            other => return Err(ValidationError::UnknownParam(other.to_string())),
        }
        Ok(())
    }

    /// Render the current settings, one `name = value` line per option.
    pub fn render(&self) -> String {
        format!(
            "model = {}\ntemperature = {}\nmax_tokens = {}\ntop_p = {}\nfrequency_penalty = {}\npresence_penalty = {}",
            self.model,
            self.temperature,
            self.max_tokens,
            self.top_p,
            self.frequency_penalty,
            self.presence_penalty,
        )
    }
}

fn invalid(name: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidParamValue {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_ranged_f64(
    name: &str,
    value: &str,
    min: f64,
    max: f64,
) -> Result<f64, ValidationError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| invalid(name, &format!("expected a number between {min} and {max}")))?;
    if !parsed.is_finite() || parsed < min || parsed > max {
        return Err(invalid(
            name,
            &format!("expected a number between {min} and {max}"),
        ));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ChatParams::default();
        assert_eq!(params.model, "gpt-3.5-turbo");
        assert!((params.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(params.max_tokens, 1000);
        assert!((params.top_p - 1.0).abs() < f64::EPSILON);
        assert_eq!(params.frequency_penalty, 0.0);
        assert_eq!(params.presence_penalty, 0.0);
    }

    #[test]
    fn test_set_temperature_in_range() {
        let mut params = ChatParams::default();
        params.set("temperature", "0.8").unwrap();
        assert!((params.temperature - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_temperature_out_of_range_rejected() {
        let mut params = ChatParams::default();
        let err = params.set("temperature", "5").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidParamValue {
                name: "temperature".to_string(),
                reason: "expected a number between 0 and 2".to_string(),
            }
        );
        // unchanged on failure
        assert!((params.temperature - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_unknown_param_rejected() {
        let mut params = ChatParams::default();
        let err = params.set("frobnicate", "1").unwrap_err();
        assert_eq!(err, ValidationError::UnknownParam("frobnicate".to_string()));
    }

    #[test]
    fn test_set_max_tokens_requires_positive_integer() {
        let mut params = ChatParams::default();
        assert!(params.set("max_tokens", "0").is_err());
        assert!(params.set("max_tokens", "-5").is_err());
        assert!(params.set("max_tokens", "2.5").is_err());
        params.set("max_tokens", "4096").unwrap();
        assert_eq!(params.max_tokens, 4096);
    }

    #[test]
    fn test_set_model_rejects_empty() {
        let mut params = ChatParams::default();
        assert!(params.set("model", "   ").is_err());
        params.set("model", "gpt-4o").unwrap();
        assert_eq!(params.model, "gpt-4o");
    }

    #[test]
    fn test_penalties_range() {
        let mut params = ChatParams::default();
        params.set("frequency_penalty", "-2").unwrap();
        params.set("presence_penalty", "1.5").unwrap();
        assert!(params.set("frequency_penalty", "2.1").is_err());
        assert!(params.set("presence_penalty", "-3").is_err());
    }

    #[test]
    fn test_render_lists_every_option() {
        let rendered = ChatParams::default().render();
        for name in OPTION_NAMES {
            assert!(rendered.contains(name), "missing {name} in render");
        }
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let params: ChatParams = serde_json::from_str(r#"{"model":"gpt-4o"}"#).unwrap();
        assert_eq!(params.model, "gpt-4o");
        assert_eq!(params.max_tokens, 1000);
    }
}
