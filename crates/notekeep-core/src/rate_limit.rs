//! Fixed-window request counter keyed by client IP.
//!
//! Each IP gets a window that starts at its first request. Requests inside
//! the window increment the count; once the window is older than the window
//! length the next request starts a fresh window with count 1. A request is
//! rejected when the count, including itself, exceeds the limit.
//!
//! Windows live in a [`DashMap`]; the per-key entry lock makes
//! check-and-increment atomic under concurrent requests from one IP.
//! State is in memory only and resets on restart.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{CoreError, CoreResult};

pub const DEFAULT_MAX_REQUESTS: u32 = 50;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct RateWindow {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<IpAddr, RateWindow>,
    max_requests: u32,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    /// Records a request from `ip` now.
    pub fn check(&self, ip: IpAddr) -> CoreResult<u32> {
        self.check_at(ip, Instant::now())
    }

    /// Records a request from `ip` at `now` and returns the count in the
    /// current window.
    ///
    /// # Errors
    ///
    /// [`CoreError::RateLimited`] if the count exceeds the limit.
    pub fn check_at(&self, ip: IpAddr, now: Instant) -> CoreResult<u32> {
        let count = match self.windows.entry(ip) {
            Entry::Vacant(slot) => {
                slot.insert(RateWindow { started: now, count: 1 });
                1
            }
            Entry::Occupied(mut slot) => {
                let window = slot.get_mut();
                if now.saturating_duration_since(window.started) > self.window {
                    *window = RateWindow { started: now, count: 1 };
                } else {
                    window.count = window.count.saturating_add(1);
                }
                window.count
            }
        };

        if count > self.max_requests {
            tracing::warn!("rate limit exceeded for {ip}: {count} requests in window");
            return Err(CoreError::RateLimited);
        }
        Ok(count)
    }

    /// Drops windows that have aged out, so idle clients don't accumulate.
    pub fn evict_stale(&self) {
        self.evict_stale_at(Instant::now());
    }

    pub fn evict_stale_at(&self, now: Instant) {
        let window = self.window;
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.started) <= window);
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}
