//! Fixed-window request counter keyed by client.
//!
//! The first request from a key opens a window of `window` length. Every
//! request inside it increments the count, and once the count passes `max`
//! the key is limited until the window ends. Nothing resets early.
//!
//! Entries live in a `DashMap`, so a check only locks the shard holding
//! its key. State is in-process and lost on restart.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Outcome of a limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

/// Shared fixed-window limiter. Cloning shares the underlying table.
#[derive(Debug, Clone)]
pub struct WindowRateLimiter {
    entries: Arc<DashMap<String, WindowEntry>>,
    window: Duration,
    max_requests: u32,
}

impl WindowRateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            window,
            max_requests,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Count one request from `key` at `now` and decide whether it passes.
    pub fn check(&self, key: &str, now: Instant) -> RateDecision {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert(WindowEntry {
                count: 0,
                reset_at: now + self.window,
            });

        if now > entry.reset_at {
            *entry = WindowEntry {
                count: 0,
                reset_at: now + self.window,
            };
        }
        entry.count = entry.count.saturating_add(1);

        if entry.count > self.max_requests {
            RateDecision::Limited {
                retry_after: entry.reset_at.saturating_duration_since(now),
            }
        } else {
            RateDecision::Allowed {
                remaining: self.max_requests - entry.count,
            }
        }
    }

    /// Drop entries whose window has ended. Returns how many were removed.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now <= entry.reset_at);
        before.saturating_sub(self.entries.len())
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> WindowRateLimiter {
        WindowRateLimiter::new(Duration::from_secs(60), 10)
    }

    #[test]
    fn test_eleventh_request_is_limited() {
        let limiter = limiter();
        let t0 = Instant::now();

        for i in 0..10 {
            let decision = limiter.check("10.0.0.1", t0 + Duration::from_secs(i));
            assert_eq!(decision, RateDecision::Allowed { remaining: 9 - i as u32 });
        }

        let decision = limiter.check("10.0.0.1", t0 + Duration::from_secs(10));
        assert_eq!(
            decision,
            RateDecision::Limited {
                retry_after: Duration::from_secs(50)
            }
        );
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter();
        let t0 = Instant::now();
        for _ in 0..11 {
            limiter.check("a", t0);
        }
        assert!(!limiter.check("a", t0).is_allowed());
        assert!(limiter.check("b", t0).is_allowed());
        assert_eq!(limiter.len(), 2);
    }

    #[test]
    fn test_window_resets_only_after_reset_at() {
        let limiter = WindowRateLimiter::new(Duration::from_secs(60), 1);
        let t0 = Instant::now();
        assert!(limiter.check("ip", t0).is_allowed());
        assert!(!limiter.check("ip", t0 + Duration::from_secs(30)).is_allowed());
        // Exactly at reset_at the window is still closed.
        assert!(!limiter.check("ip", t0 + Duration::from_secs(60)).is_allowed());
        assert!(limiter.check("ip", t0 + Duration::from_secs(61)).is_allowed());
    }

    #[test]
    fn test_limited_requests_do_not_extend_window() {
        let limiter = WindowRateLimiter::new(Duration::from_secs(10), 1);
        let t0 = Instant::now();
        limiter.check("ip", t0);
        let RateDecision::Limited { retry_after } = limiter.check("ip", t0 + Duration::from_secs(4))
        else {
            panic!("expected limited");
        };
        assert_eq!(retry_after, Duration::from_secs(6));
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let limiter = limiter();
        let t0 = Instant::now();
        limiter.check("old", t0);
        limiter.check("new", t0 + Duration::from_secs(45));

        assert_eq!(limiter.sweep_expired(t0 + Duration::from_secs(30)), 0);
        assert_eq!(limiter.sweep_expired(t0 + Duration::from_secs(61)), 1);
        assert_eq!(limiter.len(), 1);
        assert!(limiter.check("old", t0 + Duration::from_secs(62)).is_allowed());
    }

    #[test]
    fn test_clones_share_state() {
        let limiter = WindowRateLimiter::new(Duration::from_secs(60), 1);
        let other = limiter.clone();
        let t0 = Instant::now();
        limiter.check("ip", t0);
        assert!(!other.check("ip", t0).is_allowed());
    }

    #[test]
    fn test_concurrent_checks_count_every_request() {
        let limiter = WindowRateLimiter::new(Duration::from_secs(60), 100);
        let t0 = Instant::now();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .filter(|_| limiter.check("shared", t0).is_allowed())
                        .count()
                })
            })
            .collect();
        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 100);
    }
}
