//! Elapsed-time counter shared between the tick task and the game loop.
//!
//! The tick source fires every 100 ms and performs a single atomic add; the
//! main loop only ever reads the counter. On RP2040 a 32-bit add is a native
//! atomic, and `portable-atomic` keeps the same code sound on cores without
//! atomics (and on the host, where the tests run).

use portable_atomic::{AtomicU32, Ordering};

/// Milliseconds added per clock tick.
pub const TICK_MS: u32 = 100;

pub struct GameClock {
    elapsed_ms: AtomicU32,
}

impl GameClock {
    pub const fn new() -> Self {
        Self {
            elapsed_ms: AtomicU32::new(0),
        }
    }

    /// Called from the periodic tick task, nowhere else.
    pub fn tick(&self) {
        self.elapsed_ms.fetch_add(TICK_MS, Ordering::Relaxed);
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms.load(Ordering::Relaxed)
    }

    /// Only the session reset points call this.
    pub fn reset(&self) {
        self.elapsed_ms.store(0, Ordering::Relaxed);
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_in_fixed_steps() {
        let clock = GameClock::new();
        assert_eq!(clock.elapsed_ms(), 0);
        for n in 1..=5 {
            clock.tick();
            assert_eq!(clock.elapsed_ms(), n * TICK_MS);
        }
    }

    #[test]
    fn reset_returns_to_zero() {
        let clock = GameClock::new();
        for _ in 0..30 {
            clock.tick();
        }
        clock.reset();
        assert_eq!(clock.elapsed_ms(), 0);
    }
}
