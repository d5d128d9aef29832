/// Default seed for oscillators that never asked for a specific one.
pub const DEFAULT_NOISE_SEED: u32 = 1;

/// Fast pseudo-random number generator for audio applications
/// Uses a linear congruential generator (LCG) for deterministic, fast noise
///
/// Each oscillator owns one, so voices never contend over shared RNG state
/// and equal seeds reproduce equal noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseSource {
    state: u32,
}

impl NoiseSource {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed }, // Avoid zero seed
        }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Uniform value in [0.0, 1.0)
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        // top 24 bits fit the f32 mantissa exactly, so the result never rounds up to 1.0
        (self.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    /// Uniform value in [-1.0, 1.0)
    #[inline]
    pub fn next_bipolar(&mut self) -> f32 {
        (self.next_f32() - 0.5) * 2.0
    }
}

impl Default for NoiseSource {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE_SEED)
    }
}
