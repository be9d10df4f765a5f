//! Randomness used to spread intervals so cards reviewed together do not
//! keep coming due together.

use rand::{Rng, rngs::ThreadRng};

/// Source of fuzz draws.
///
/// `draw` returns a value in `[0, 1]`; the engine scales it by the spread of
/// the current phase and multiplies the interval by `1 + draw * spread`.
pub trait Fuzz {
    fn draw(&mut self) -> f64;
}

/// Uniform fuzz backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomFuzz<R = ThreadRng> {
    rng: R,
}

impl<R: Rng> RandomFuzz<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RandomFuzz<ThreadRng> {
    fn default() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> Fuzz for RandomFuzz<R> {
    fn draw(&mut self) -> f64 {
        self.rng.gen_range(0.0..=1.0)
    }
}

/// Fuzz that always returns the same draw, clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFuzz(f64);

impl FixedFuzz {
    /// No perturbation at all.
    pub const NONE: Self = Self(0.0);
    /// Largest perturbation allowed by the phase's spread.
    pub const MAX: Self = Self(1.0);

    pub fn new(draw: f64) -> Self {
        if draw.is_nan() {
            return Self::NONE;
        }
        Self(draw.clamp(0.0, 1.0))
    }
}

impl Fuzz for FixedFuzz {
    fn draw(&mut self) -> f64 {
        self.0
    }
}

impl<F: Fuzz + ?Sized> Fuzz for &mut F {
    fn draw(&mut self) -> f64 {
        (**self).draw()
    }
}
