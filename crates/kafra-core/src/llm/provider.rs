//! LlmProvider trait definition.
//!
//! This is the core abstraction that every remote chat backend implements.
//! Uses RPITIT for `complete`, so it is not object safe on its own; see
//! `BoxLlmProvider` for dynamic dispatch.

use kafra_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for remote chat backends (the Kafra server, OpenAI, Gemini).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// Implementations live in kafra-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "kafra_server", "gemini").
    fn name(&self) -> &str;

    /// Default model identifier used when a request leaves `model` empty.
    fn model(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
