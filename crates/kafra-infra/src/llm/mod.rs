//! LLM provider implementations.
//!
//! Concrete [`LlmProvider`](kafra_core::llm::provider::LlmProvider)
//! implementations plus the factories that build the dispatcher's primary
//! and secondary backends from configuration.

pub mod kafra_server;
pub mod openai_compat;

use secrecy::SecretString;

use kafra_core::llm::box_provider::BoxLlmProvider;
use kafra_types::llm::{LlmError, ProviderType};

use self::kafra_server::KafraServerBackend;
use self::openai_compat::OpenAiCompatibleProvider;

/// Build a direct AI provider of the given type.
///
/// # Errors
///
/// `AuthenticationFailed` when the provider needs an API key and none was
/// resolved; `InvalidRequest` for `KafraServer`, which is addressed by URL
/// rather than by key (see [`create_primary`]).
pub fn create_provider(
    provider_type: ProviderType,
    model: &str,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    match provider_type {
        ProviderType::OpenAi => {
            let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
            Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::openai(key, model)))
        }
        ProviderType::Gemini => {
            let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
            Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::gemini(key, model)))
        }
        ProviderType::KafraServer => Err(LlmError::InvalidRequest(
            "kafra_server is configured through client.api_url".to_string(),
        )),
    }
}

/// Build the primary backend for the chat server at `api_url`.
pub fn create_primary(api_url: &str) -> Result<BoxLlmProvider, LlmError> {
    Ok(BoxLlmProvider::new(KafraServerBackend::new(api_url)?))
}
