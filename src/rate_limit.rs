//! Sliding-window rate limiter for user-initiated refreshes
//!
//! Counts logical refresh actions, not individual HTTP attempts. Timestamps use
//! `tokio::time::Instant` so a paused test clock drives the window.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

/// Default number of accepted requests per window
pub const DEFAULT_MAX_REQUESTS: usize = 10;

/// Default window length
pub const DEFAULT_TIME_WINDOW: Duration = Duration::from_secs(60);

/// Accepts at most `max_requests` calls in any `time_window`.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Accepted request instants, oldest first
    requests: VecDeque<Instant>,
    max_requests: usize,
    time_window: Duration,
}

impl RateLimiter {
    /// A `max_requests` of 0 is raised to 1, so a rejection always has a
    /// tracked request to wait on.
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        Self {
            requests: VecDeque::new(),
            max_requests: max_requests.max(1),
            time_window,
        }
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn time_window(&self) -> Duration {
        self.time_window
    }

    /// Number of accepted requests currently tracked, including any not yet pruned.
    pub fn tracked(&self) -> usize {
        self.requests.len()
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.requests.front() {
            if now.duration_since(oldest) >= self.time_window {
                self.requests.pop_front();
            } else {
                break;
            }
        }
    }

    /// Records and allows a request if the window has room, otherwise rejects it
    /// without recording anything.
    pub fn can_make_request(&mut self) -> bool {
        let now = Instant::now();
        self.prune(now);

        if self.requests.len() < self.max_requests {
            self.requests.push_back(now);
            true
        } else {
            false
        }
    }

    /// Time until the oldest tracked request leaves the window, zero if none are tracked.
    pub fn wait_time(&self) -> Duration {
        match self.requests.front() {
            Some(&oldest) => self.time_window.saturating_sub(oldest.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// `wait_time` in whole seconds, rounded up for display to the user.
    pub fn wait_secs(&self) -> u64 {
        let wait = self.wait_time();
        let secs = wait.as_secs();
        if wait.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_TIME_WINDOW)
    }
}
