//! Configuration for the generation backend

pub const DEFAULT_GENERATION_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_MODEL: &str = "microsoft/DialoGPT-small";
/// GPT-2 family end-of-text marker, used by DialoGPT as the turn separator
pub const DEFAULT_EOS_TOKEN: &str = "<|endoftext|>";

/// Backend location and model profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Base URL of a text-generation-inference compatible server
    pub base_url: String,
    /// Bearer token for hosted endpoints
    pub api_token: Option<String>,
    pub model: String,
    pub eos_token: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GENERATION_URL.to_string(),
            api_token: None,
            model: DEFAULT_MODEL.to_string(),
            eos_token: DEFAULT_EOS_TOKEN.to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: lookup("QUICK_CHAT_GENERATION_URL").unwrap_or(defaults.base_url),
            api_token: lookup("QUICK_CHAT_GENERATION_TOKEN").filter(|t| !t.is_empty()),
            model: lookup("QUICK_CHAT_MODEL").unwrap_or(defaults.model),
            eos_token: lookup("QUICK_CHAT_EOS_TOKEN").unwrap_or(defaults.eos_token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = GeneratorConfig::from_lookup(|_| None);
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.eos_token, "<|endoftext|>");
    }

    #[test]
    fn test_overrides_and_empty_token() {
        let vars: HashMap<&str, &str> = [
            ("QUICK_CHAT_GENERATION_URL", "http://gpu-box:3000"),
            ("QUICK_CHAT_GENERATION_TOKEN", ""),
            ("QUICK_CHAT_MODEL", "microsoft/DialoGPT-medium"),
        ]
        .into_iter()
        .collect();
        let config = GeneratorConfig::from_lookup(|k| vars.get(k).map(ToString::to_string));
        assert_eq!(config.base_url, "http://gpu-box:3000");
        assert_eq!(config.api_token, None);
        assert_eq!(config.model, "microsoft/DialoGPT-medium");
        assert_eq!(config.eos_token, DEFAULT_EOS_TOKEN);
    }
}
