//! LLM provider abstractions for Kafra.
//!
//! - `LlmProvider`: RPITIT trait for concrete backends (Kafra server, OpenAI, Gemini)
//! - `BoxLlmProvider`: object-safe wrapper for dynamic dispatch

pub mod box_provider;
pub mod provider;
