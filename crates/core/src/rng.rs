//! RNG module - injectable random sources
//!
//! The game draws piece kinds and spawn slots through [`RandomSource`], so a
//! replay or a test can swap in a fixed sequence. [`SimpleRng`] is a small
//! deterministic LCG for normal play.

/// Uniform integers in `[0, bound)`.
pub trait RandomSource {
    /// `bound` must be non-zero.
    fn next_int(&mut self, bound: u32) -> u32;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Current state, usable as a seed to resume the same sequence.
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_int(&mut self, bound: u32) -> u32 {
        // multiply-shift keeps the high bits
        ((self.next_u32() as u64 * bound.max(1) as u64) >> 32) as u32
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Replays a fixed list of values (taken modulo the bound), cycling.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<u32>,
    pos: usize,
}

impl ScriptedRng {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, pos: 0 }
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl RandomSource for ScriptedRng {
    fn next_int(&mut self, bound: u32) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.pos % self.values.len()];
        self.pos += 1;
        value % bound.max(1)
    }
}
