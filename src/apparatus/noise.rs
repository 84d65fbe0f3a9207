//! Random sources for instrument jitter.
//!
//! Meter readings carry a small multiplicative jitter so that repeated
//! readings at the same rheostat setting differ. The randomness comes from a
//! [`NoiseSource`] owned by the experiment, so tests and reproducible runs can
//! swap the thread RNG for a seeded or fixed source.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform samples in `[0, 1)`.
pub trait NoiseSource {
    /// Draw the next sample.
    fn sample(&mut self) -> f64;
}

/// Apply multiplicative jitter: `value · (1 + (u - 0.5) · amplitude)`.
///
/// With `amplitude = 0.02` the result stays within ±1 % of `value`.
pub fn jitter(value: f64, u: f64, amplitude: f64) -> f64 {
    value * (1.0 + (u - 0.5) * amplitude)
}

/// Unseeded noise from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngNoise;

impl NoiseSource for ThreadRngNoise {
    fn sample(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Reproducible noise from a seeded [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededNoise {
    rng: StdRng,
}

impl SeededNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for SeededNoise {
    fn sample(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always returns the same sample. `FixedNoise(0.5)` disables jitter.
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(pub f64);

impl Default for FixedNoise {
    fn default() -> Self {
        Self(0.5)
    }
}

impl NoiseSource for FixedNoise {
    fn sample(&mut self) -> f64 {
        self.0
    }
}

/// Cycles through a fixed list of samples.
#[derive(Debug, Clone)]
pub struct SequenceNoise {
    samples: VecDeque<f64>,
}

impl SequenceNoise {
    /// An empty list behaves like `FixedNoise(0.5)`.
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }
}

impl NoiseSource for SequenceNoise {
    fn sample(&mut self) -> f64 {
        match self.samples.pop_front() {
            Some(u) => {
                self.samples.push_back(u);
                u
            }
            None => 0.5,
        }
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    fn sample(&mut self) -> f64 {
        (**self).sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_jitter_bounds() {
        assert_eq!(jitter(2.0, 0.5, 0.02), 2.0);
        assert_relative_eq!(jitter(2.0, 0.0, 0.02), 1.98);
        assert_relative_eq!(jitter(2.0, 1.0, 0.02), 2.02);
    }

    #[test]
    fn test_thread_rng_in_range() {
        let mut noise = ThreadRngNoise;
        for _ in 0..100 {
            let u = noise.sample();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SeededNoise::new(7);
        let mut b = SeededNoise::new(7);
        for _ in 0..10 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_sequence_cycles() {
        let mut noise = SequenceNoise::new([0.1, 0.9]);
        assert_eq!(noise.sample(), 0.1);
        assert_eq!(noise.sample(), 0.9);
        assert_eq!(noise.sample(), 0.1);
        assert_eq!(SequenceNoise::new(Vec::new()).sample(), 0.5);
    }
}
