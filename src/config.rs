use thiserror::Error;

use crate::invoker::ModelCandidates;
use crate::llm::DEMO_KEY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, PartialEq)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base: String,
    pub preferred_model: String,
    pub fallback_model: String,
    pub faq_model: String,
    pub temperature: f32,
    pub port: u16,
}

// Keeps the credential out of logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &if self.is_demo() { DEMO_KEY } else { "<redacted>" })
            .field("api_base", &self.api_base)
            .field("preferred_model", &self.preferred_model)
            .field("fallback_model", &self.fallback_model)
            .field("faq_model", &self.faq_model)
            .field("temperature", &self.temperature)
            .field("port", &self.port)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str, default: &str| {
            lookup(name).filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string())
        };
        let temperature = get("TEMPERATURE", "0.7");
        let port = get("PORT", "8080");

        Ok(Self {
            api_key: get("OPENAI_API_KEY", DEMO_KEY),
            api_base: get("OPENAI_API_BASE", "https://api.openai.com/v1"),
            preferred_model: get("PREFERRED_MODEL", "gpt-4o"),
            // set but blank disables the fallback
            fallback_model: lookup("FALLBACK_MODEL")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            faq_model: get("FAQ_MODEL", "gpt-3.5-turbo"),
            temperature: temperature.parse().map_err(|_| ConfigError::Invalid { name: "TEMPERATURE", value: temperature.clone() })?,
            port: port.parse().map_err(|_| ConfigError::Invalid { name: "PORT", value: port.clone() })?,
        })
    }

    pub fn is_demo(&self) -> bool {
        self.api_key == DEMO_KEY
    }

    /// Language candidates: preferred model first, then the fallback if any.
    pub fn candidates(&self) -> ModelCandidates {
        let fallback = Some(self.fallback_model.clone()).filter(|m| !m.is_empty());
        ModelCandidates::with_fallback(self.preferred_model.as_str(), fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_to_demo_mode() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert!(cfg.is_demo());
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.temperature, 0.7);
        assert_eq!(cfg.candidates(), ModelCandidates::with_fallback("gpt-4o", Some("gpt-3.5-turbo".into())));
    }

    #[test]
    fn overrides_and_bad_numbers() {
        let cfg = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test"), ("PREFERRED_MODEL", "m1"), ("PORT", "9000")])).unwrap();
        assert!(!cfg.is_demo());
        assert_eq!(cfg.preferred_model, "m1");
        assert_eq!(cfg.port, 9000);

        let err = AppConfig::from_lookup(lookup(&[("TEMPERATURE", "warm")])).unwrap_err();
        assert_eq!(err.to_string(), "TEMPERATURE must be a number, got \"warm\"");
    }

    #[test]
    fn blank_fallback_leaves_a_single_candidate() {
        let cfg = AppConfig::from_lookup(lookup(&[("PREFERRED_MODEL", "m1"), ("FALLBACK_MODEL", " ")])).unwrap();
        assert_eq!(cfg.fallback_model, "");
        assert_eq!(cfg.candidates(), ModelCandidates::single("m1"));

        let cfg = AppConfig::from_lookup(lookup(&[("PREFERRED_MODEL", "")])).unwrap();
        assert_eq!(cfg.candidates(), ModelCandidates::with_fallback("gpt-4o", Some("gpt-3.5-turbo".into())));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let cfg = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-secret-123")])).unwrap();
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("sk-"));
        assert!(printed.contains("api_key: \"<redacted>\""));
        assert!(format!("{:?}", AppConfig::from_lookup(lookup(&[])).unwrap()).contains("DEMO_KEY"));
    }
}
