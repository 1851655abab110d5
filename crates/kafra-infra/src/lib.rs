//! Infrastructure layer for Kafra.
//!
//! Concrete implementations of the `LlmProvider` port from `kafra-core`
//! (OpenAI-compatible APIs and the Kafra chat server) and configuration
//! loading from `config.toml` plus the environment.

pub mod config;
pub mod llm;
pub mod secret;
