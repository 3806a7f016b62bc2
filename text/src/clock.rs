//! Monotonic tick sources used to decide edit coalescing.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

/// A monotonic clock.
pub trait TickSource {
    fn now(&self) -> u64;

    /// Ticks per second.
    fn tick_rate(&self) -> u64;
}

/// Microsecond ticks since the source was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemTicks {
    origin: Instant,
}

impl SystemTicks {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SystemTicks {
    fn now(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    fn tick_rate(&self) -> u64 {
        1_000_000
    }
}

/// A clock that only moves when told to. Ticks are milliseconds.
#[derive(Debug, Default)]
pub struct ManualTicks {
    now: AtomicU64,
}

impl ManualTicks {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn advance(&self, ticks: u64) {
        self.now.fetch_add(ticks, Ordering::Relaxed);
    }

    pub fn set(&self, ticks: u64) {
        self.now.store(ticks, Ordering::Relaxed);
    }
}

impl TickSource for ManualTicks {
    fn now(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }

    fn tick_rate(&self) -> u64 {
        1_000
    }
}
