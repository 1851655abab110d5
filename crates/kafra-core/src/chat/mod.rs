//! Conversation handling for the Kafra assistant.
//!
//! The dispatcher decides who answers a message: the primary backend, the
//! secondary provider, or the keyword-matched fallback table.

pub mod dispatcher;
pub mod matcher;
pub mod phrases;
pub mod rate_gate;
pub mod session;
