//! Shared state for the chat server.
//!
//! Cloned into every handler; the provider and configuration sit behind
//! `Arc`s and the limiter shares its table across clones.

use std::sync::Arc;

use kafra_core::llm::box_provider::BoxLlmProvider;
use kafra_core::ratelimit::WindowRateLimiter;
use kafra_infra::llm::create_provider;
use kafra_infra::secret::Secrets;
use kafra_types::config::ServerConfig;
use kafra_types::llm::ProviderType;

#[derive(Clone)]
pub struct AppState {
    /// Upstream model provider; `None` when no API key is configured.
    pub provider: Option<Arc<BoxLlmProvider>>,
    pub limiter: WindowRateLimiter,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, provider: Option<BoxLlmProvider>) -> Self {
        let limiter = WindowRateLimiter::new(
            config.rate_limit.window(),
            config.rate_limit.max_requests,
        );
        Self {
            provider: provider.map(Arc::new),
            limiter,
            config: Arc::new(config),
        }
    }

    /// Wire the OpenAI upstream from the resolved secrets.
    pub fn from_config(config: ServerConfig, secrets: &Secrets) -> Self {
        let provider = match create_provider(
            ProviderType::OpenAi,
            &config.model,
            secrets.for_provider(ProviderType::OpenAi),
        ) {
            Ok(provider) => Some(provider),
            Err(err) => {
                tracing::warn!(error = %err, "No upstream provider; chat requests will fail");
                None
            }
        };
        Self::new(config, provider)
    }
}
