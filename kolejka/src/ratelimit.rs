//! Outbound API rate limiting.
//!
//! The queues API allows a fixed number of requests per second. The
//! limiter here is a suspending gate shared by every fetcher: callers
//! always eventually proceed, they are never rejected. Page fetches are
//! strictly sequential by contract, so acquisition serializes on one
//! async lock and that lock doubles as the window state's single
//! serialization point.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::trace;

/// Count and start instant of the current window.
#[derive(Debug)]
struct RateWindow {
    window_start: Instant,
    count_in_window: u32,
}

/// Suspending fixed-window rate limiter.
///
/// Tracks how many acquisitions the current window has seen. An acquire
/// that would exceed the allowance sleeps until the window boundary,
/// restarts the window, and proceeds as that fresh window's first entry.
/// A window that has simply expired is restarted without sleeping.
pub struct RateLimiter {
    max_per_window: u32,
    window: Duration,
    state: Mutex<RateWindow>,

    /// How many acquisitions had to sleep, for diagnostics.
    boundary_waits: AtomicU64,
}

impl RateLimiter {
    /// Creates a limiter allowing `max_per_window` acquisitions per
    /// `window`.
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            state: Mutex::new(RateWindow {
                window_start: Instant::now(),
                count_in_window: 0,
            }),
            boundary_waits: AtomicU64::new(0),
        }
    }

    /// Waits until another outbound call is permitted.
    ///
    /// Holds the window lock across the boundary sleep, so concurrent
    /// callers queue behind the sleeper instead of racing the reset.
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;

        let elapsed = state.window_start.elapsed();
        if elapsed >= self.window {
            state.window_start = Instant::now();
            state.count_in_window = 0;
        } else if state.count_in_window >= self.max_per_window {
            let wait = self.window - elapsed;
            self.boundary_waits.fetch_add(1, Ordering::Relaxed);
            trace!(wait_ms = wait.as_millis() as u64, "rate window full, sleeping");
            tokio::time::sleep(wait).await;

            state.window_start = Instant::now();
            state.count_in_window = 0;
        }

        state.count_in_window += 1;
    }

    /// Number of acquisitions that had to sleep at a window boundary.
    pub fn boundary_waits(&self) -> u64 {
        self.boundary_waits.load(Ordering::Relaxed)
    }
}
