//! Deterministic pseudo-random numbers

/// Xorshift generator.
///
/// Owned by the game context rather than kept in a thread-local so that
/// behaviors and tests get reproducible sequences from a seed.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u32,
}

impl Rng {
    /// Create a generator from a seed (zero is remapped, xorshift would stall)
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    /// Next value in `[0, 1]`
    pub fn next_f64(&mut self) -> f64 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        f64::from(s) / f64::from(u32::MAX)
    }

    /// Next value in `[min, max]`
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::new(12345)
    }
}
