//! Millisecond tick counter
//!
//! Incremented by the tick timer and read by the render pass. The counter
//! is a single atomic word so it can live in a `static` and be touched
//! from the timer dispatch context without a lock.

use portable_atomic::{AtomicU32, Ordering};

/// Monotonic millisecond counter (wraps after ~49 days)
pub struct TickCounter {
    ms: AtomicU32,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            ms: AtomicU32::new(0),
        }
    }

    /// Advance by `ms` milliseconds
    pub fn inc(&self, ms: u32) {
        self.ms.fetch_add(ms, Ordering::Relaxed);
    }

    /// Current value
    pub fn get(&self) -> u32 {
        self.ms.load(Ordering::Relaxed)
    }

    /// Milliseconds since `prev`, correct across one wrap
    pub fn elapsed_since(&self, prev: u32) -> u32 {
        self.get().wrapping_sub(prev)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_n_increments_advance_by_n() {
        let ticks = TickCounter::new();
        let start = ticks.get();
        for _ in 0..250 {
            ticks.inc(1);
        }
        assert_eq!(ticks.elapsed_since(start), 250);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        let ticks = TickCounter::new();
        ticks.inc(u32::MAX - 2);
        let before = ticks.get();
        ticks.inc(5);
        assert_eq!(ticks.get(), 2);
        assert_eq!(ticks.elapsed_since(before), 5);
    }

    #[test]
    fn test_static_counter() {
        static TICKS: TickCounter = TickCounter::new();
        let start = TICKS.get();
        TICKS.inc(3);
        assert_eq!(TICKS.elapsed_since(start), 3);
    }
}
