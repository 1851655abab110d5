//! API keys resolved from the environment.
//!
//! Each key has a primary variable name and legacy aliases inherited from
//! the web frontend's build variables. The first non-empty value wins.
//! Values are wrapped in [`SecretString`] and never logged.

use secrecy::SecretString;

use kafra_types::llm::ProviderType;

pub const OPENAI_KEY_VARS: &[&str] = &["OPENAI_API_KEY", "VITE_OPENAI_API_KEY"];
pub const GEMINI_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "VITE_GEMINI_API_KEY"];

/// Provider API keys.
#[derive(Debug, Default, Clone)]
pub struct Secrets {
    pub openai_api_key: Option<SecretString>,
    pub gemini_api_key: Option<SecretString>,
}

impl Secrets {
    /// Resolve keys from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve keys through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            openai_api_key: first_set(&lookup, OPENAI_KEY_VARS).map(SecretString::from),
            gemini_api_key: first_set(&lookup, GEMINI_KEY_VARS).map(SecretString::from),
        }
    }

    /// Key for a directly called provider, if one was resolved.
    pub fn for_provider(&self, provider: ProviderType) -> Option<SecretString> {
        match provider {
            ProviderType::OpenAi => self.openai_api_key.clone(),
            ProviderType::Gemini => self.gemini_api_key.clone(),
            ProviderType::KafraServer => None,
        }
    }
}

/// First variable in `names` with a non-blank value.
pub(crate) fn first_set(lookup: &impl Fn(&str) -> Option<String>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_primary_name_wins_over_alias() {
        let secrets = Secrets::from_lookup(env(&[
            ("OPENAI_API_KEY", "sk-primary"),
            ("VITE_OPENAI_API_KEY", "sk-alias"),
        ]));
        assert_eq!(
            secrets.openai_api_key.unwrap().expose_secret(),
            "sk-primary"
        );
    }

    #[test]
    fn test_alias_used_when_primary_blank() {
        let secrets = Secrets::from_lookup(env(&[
            ("GEMINI_API_KEY", "  "),
            ("VITE_GEMINI_API_KEY", "g-alias"),
        ]));
        assert_eq!(
            secrets
                .for_provider(ProviderType::Gemini)
                .unwrap()
                .expose_secret(),
            "g-alias"
        );
        assert!(secrets.openai_api_key.is_none());
    }

    #[test]
    fn test_debug_output_redacts_keys() {
        let secrets = Secrets::from_lookup(env(&[("OPENAI_API_KEY", "sk-very-secret")]));
        let debug = format!("{secrets:?}");
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    fn test_kafra_server_has_no_key() {
        let secrets = Secrets::from_lookup(env(&[("OPENAI_API_KEY", "sk")]));
        assert!(secrets.for_provider(ProviderType::KafraServer).is_none());
    }
}
