//! Minimum-interval gate and failure counter for outbound remote calls.
//!
//! `RateGate` is plain state: every method is a synchronous transition and
//! nothing here sleeps or errors. Callers pass `now` explicitly so the gate
//! can be driven deterministically in tests. The dispatcher owns one gate
//! behind its state mutex.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Spacing and consecutive-failure tracker for remote providers.
#[derive(Debug, Clone)]
pub struct RateGate {
    /// When the last remote call was (or is scheduled to be) issued.
    pub last_request: Option<Instant>,
    /// Minimum spacing between two remote calls.
    pub min_interval: Duration,
    /// Remote failures since the last success or reset.
    pub consecutive_errors: u32,
    /// Failures at which the secondary provider is disabled.
    pub max_consecutive_errors: u32,
}

/// Snapshot of the gate for display and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateStatus {
    pub consecutive_errors: u32,
    pub max_consecutive_errors: u32,
    pub provider_disabled: bool,
    pub min_interval_ms: u64,
    /// Milliseconds since the last attempt, if any was made.
    pub last_request_ago_ms: Option<u64>,
}

impl RateGate {
    pub fn new(min_interval: Duration, max_consecutive_errors: u32) -> Self {
        Self {
            last_request: None,
            min_interval,
            consecutive_errors: 0,
            max_consecutive_errors,
        }
    }

    /// How long a caller must wait before the next remote call.
    ///
    /// `max(0, min_interval - (now - last_request))`; zero when nothing has
    /// been sent yet. A `last_request` in the future (a reserved slot) is
    /// waited out in full plus the interval.
    pub fn should_wait(&self, now: Instant) -> Duration {
        match self.last_request {
            None => Duration::ZERO,
            Some(last) if last > now => (last - now) + self.min_interval,
            Some(last) => self.min_interval.saturating_sub(now - last),
        }
    }

    /// Stamp the time of an outbound call.
    pub fn record_attempt(&mut self, at: Instant) {
        self.last_request = Some(at);
    }

    pub fn record_success(&mut self) {
        self.consecutive_errors = 0;
    }

    pub fn record_failure(&mut self) {
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
    }

    /// True once failures reach the threshold, until success or reset.
    pub fn is_provider_disabled(&self) -> bool {
        self.consecutive_errors >= self.max_consecutive_errors
    }

    /// Operator reset: clear failures and the interval clock.
    pub fn reset(&mut self) {
        self.consecutive_errors = 0;
        self.last_request = None;
    }

    pub fn status(&self, now: Instant) -> GateStatus {
        GateStatus {
            consecutive_errors: self.consecutive_errors,
            max_consecutive_errors: self.max_consecutive_errors,
            provider_disabled: self.is_provider_disabled(),
            min_interval_ms: self.min_interval.as_millis() as u64,
            last_request_ago_ms: self
                .last_request
                .map(|last| now.saturating_duration_since(last).as_millis() as u64),
        }
    }
}
