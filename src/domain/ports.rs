// Ports for time and randomness so sessions stay deterministic under test.

/// Monotonic time source in milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Uniform random draws.
pub trait RandomSource: Send {
    /// Uniform in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        self.next_unit() * (max - min) + min
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f32) as usize).min(len - 1)
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.next_unit() < p
    }
}
