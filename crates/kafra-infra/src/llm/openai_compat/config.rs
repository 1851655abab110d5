//! Connection settings and per-vendor defaults for OpenAI-compatible APIs.

use secrecy::SecretString;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Configuration for an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Provider name used in logs and reply sources (e.g. "openai").
    pub provider_name: String,
    pub base_url: String,
    pub api_key: SecretString,
    /// Default model, used when a request leaves `model` empty.
    pub model: String,
}

/// OpenAI chat completions.
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: OPENAI_BASE_URL.into(),
        api_key,
        model: model.into(),
    }
}

/// Google Gemini through its OpenAI-compatible beta endpoint.
pub fn gemini_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        base_url: GEMINI_BASE_URL.into(),
        api_key,
        model: model.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_gemini_defaults() {
        let config = gemini_defaults(SecretString::from("g-key"), "gemini-2.0-flash");
        assert_eq!(config.provider_name, "gemini");
        assert!(config.base_url.ends_with("/v1beta/openai"));
        assert_eq!(config.api_key.expose_secret(), "g-key");
    }

    #[test]
    fn test_openai_defaults() {
        let config = openai_defaults(SecretString::from("sk-test"), "gpt-4o-mini");
        assert_eq!(config.base_url, OPENAI_BASE_URL);
        assert_eq!(config.model, "gpt-4o-mini");
    }
}
