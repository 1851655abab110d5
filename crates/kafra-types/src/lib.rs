//! Shared domain types for Kafra.
//!
//! This crate contains the data shapes used across the Kafra chat assistant:
//! chat messages, LLM request/response types, the HTTP wire format, and
//! configuration structs, plus their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod wire;
