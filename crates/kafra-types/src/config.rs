//! Configuration types for Kafra.
//!
//! `KafraConfig` represents the top-level `config.toml`. The `[server]`
//! section drives the chat proxy (`kafra serve`); the `[client]` section
//! drives the dispatcher used by `kafra chat` and `kafra ask`. Every field
//! has a default, so an empty file is a valid configuration. API keys are
//! never stored here; they come from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::llm::ProviderType;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KafraConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// Settings for the chat proxy HTTP service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upstream model identifier reported back in every reply.
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Fixed ceiling for one upstream completion call.
    pub upstream_timeout_secs: u64,
    /// Persona prompt prepended to every upstream request.
    pub system_prompt: String,
    /// Key the limiter by the first `X-Forwarded-For` entry instead of the peer address.
    pub trust_forwarded_for: bool,
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            upstream_timeout_secs: 30,
            system_prompt: "You are Kafra, the helpful assistant of the hh. blog. \
                            Answer briefly and politely in Thai unless asked otherwise."
                .to_string(),
            trust_forwarded_for: false,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ServerConfig {
    /// `None` when `upstream_timeout_secs` is 0 (no bound).
    pub fn upstream_timeout(&self) -> Option<Duration> {
        secs_or_unbounded(self.upstream_timeout_secs)
    }
}

/// Per-client request window for `POST /api/kafra-chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
    /// How often expired client entries are purged.
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 10,
            sweep_interval_secs: 300,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Settings for the client-side dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the Kafra chat server (primary backend).
    pub api_url: Option<String>,
    /// Minimum spacing between outbound remote calls.
    pub min_interval_ms: u64,
    /// Consecutive remote failures before the secondary provider is disabled.
    pub max_consecutive_errors: u32,
    /// Ceiling for each individual remote call.
    pub remote_timeout_secs: u64,
    /// How many prior messages are sent along with a new one.
    pub history_limit: usize,
    /// Provider used when the primary backend fails.
    pub secondary_provider: ProviderType,
    pub secondary_model: String,
    pub max_tokens: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Some("http://127.0.0.1:3001".to_string()),
            min_interval_ms: 1_000,
            max_consecutive_errors: 3,
            remote_timeout_secs: 30,
            history_limit: 10,
            secondary_provider: ProviderType::Gemini,
            secondary_model: "gemini-2.0-flash".to_string(),
            max_tokens: 500,
        }
    }
}

impl ClientConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// `None` when `remote_timeout_secs` is 0 (no bound).
    pub fn remote_timeout(&self) -> Option<Duration> {
        secs_or_unbounded(self.remote_timeout_secs)
    }
}

fn secs_or_unbounded(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
