//! Interactive terminal chat with Kafra.
//!
//! Entry point: `loop_runner::run_chat_loop`.

pub mod commands;
pub mod display;
pub mod input;
pub mod loop_runner;
