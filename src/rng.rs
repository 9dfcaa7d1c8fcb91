//! xorshift32 PRNG. Small, deterministic, no_std.

pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform-ish value in `[0, max)`. `max` must be positive.
    pub fn range(&mut self, max: i32) -> i32 {
        debug_assert!(max > 0);
        (self.next_u32() % max as u32) as i32
    }
}
