//! Per-client request limiting for the HTTP service.

pub mod window;

pub use window::{RateDecision, WindowRateLimiter};
