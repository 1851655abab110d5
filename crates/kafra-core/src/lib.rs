//! Business logic for the Kafra chat assistant.
//!
//! This crate defines the `LlmProvider` port that the infrastructure layer
//! implements, plus everything that decides what Kafra answers: the fallback
//! phrase table, the keyword matcher, the rate gate, the dispatcher, and the
//! per-client window limiter used by the HTTP service. It depends only on
//! `kafra-types` -- never on `kafra-infra` or any HTTP crate.

pub mod chat;
pub mod llm;
pub mod ratelimit;
