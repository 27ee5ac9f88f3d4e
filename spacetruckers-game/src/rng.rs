//! Pluggable uniform random source used by every stochastic draw.
//!
//! The simulation only ever asks for "the next uniform value in `[0,1)`";
//! integer ranges, coin flips, and list picks are derived from that single
//! primitive so tests can script exact outcomes.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use sha2::Sha256;

/// Source of uniform draws in `[0,1)`.
pub trait UniformSource {
    /// Next uniform value in `[0,1)`.
    fn next_uniform(&mut self) -> f64;

    /// Uniform integer in `[min, max]` (inclusive on both ends).
    fn roll_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = crate::numbers::i64_to_f64(max - min + 1);
        let offset = (self.next_uniform() * span).floor();
        // Guards against a misbehaving source returning exactly 1.0.
        (min + crate::numbers::round_f64_to_i64(offset)).min(max)
    }

    /// Bernoulli trial succeeding with probability `probability`.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_uniform() < probability
    }

    /// Uniform index into a collection of `len` items, `None` when empty.
    ///
    /// Consumes exactly one draw for any non-empty collection, single items included.
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let max = i64::try_from(len - 1).unwrap_or(i64::MAX);
        let span = crate::numbers::i64_to_f64(max + 1);
        let offset = crate::numbers::round_f64_to_i64((self.next_uniform() * span).floor());
        usize::try_from(offset.clamp(0, max)).ok()
    }
}

impl<T: UniformSource + ?Sized> UniformSource for &mut T {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

impl<T: UniformSource + ?Sized> UniformSource for Box<T> {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

/// Production source backed by `SmallRng`, counting draws for diagnostics.
#[derive(Debug, Clone)]
pub struct SimRng {
    rng: SmallRng,
    draws: u64,
}

impl SimRng {
    /// Seed from operating-system entropy. Sessions are not replayable.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
            draws: 0,
        }
    }

    /// Seed deterministically from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(derive_stream_seed(seed, b"spacetruckers.sim")),
            draws: 0,
        }
    }

    /// Number of uniform draws served so far.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl UniformSource for SimRng {
    fn next_uniform(&mut self) -> f64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.r#gen::<f64>()
    }
}

/// Adapter exposing any `rand` generator as a [`UniformSource`].
#[derive(Debug, Clone)]
pub struct RandSource<R>(pub R);

impl<R: RngCore> UniformSource for RandSource<R> {
    fn next_uniform(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

/// Deterministic source cycling through a fixed list of values.
#[derive(Debug, Clone)]
pub struct ScriptedUniform {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedUniform {
    /// Build a scripted source. Values are clamped into `[0,1)`; an empty
    /// script always yields `0.0`.
    #[must_use]
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|value| {
                if value.is_finite() {
                    value.clamp(0.0, 1.0 - f64::EPSILON)
                } else {
                    0.0
                }
            })
            .collect();
        Self { values, cursor: 0 }
    }

    /// A source that always returns the same value.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Draws consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for ScriptedUniform {
    fn next_uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.saturating_add(1);
        value
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_range_maps_unit_interval_inclusively() {
        let mut low = ScriptedUniform::constant(0.0);
        assert_eq!(low.roll_range(5, 18), 5);
        let mut high = ScriptedUniform::constant(0.999_999);
        assert_eq!(high.roll_range(5, 18), 18);
        let mut mid = ScriptedUniform::constant(0.5);
        assert_eq!(mid.roll_range(-1, 2), 1);
    }

    #[test]
    fn degenerate_ranges_return_min() {
        let mut rng = ScriptedUniform::constant(0.7);
        assert_eq!(rng.roll_range(4, 4), 4);
        assert_eq!(rng.roll_range(9, 3), 9);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn pick_index_handles_empty_and_bounds() {
        let mut rng = ScriptedUniform::new(vec![0.0, 0.99]);
        assert_eq!(rng.pick_index(0), None);
        assert_eq!(rng.pick_index(10), Some(0));
        assert_eq!(rng.pick_index(10), Some(9));
    }

    #[test]
    fn pick_index_draws_once_even_for_a_single_item() {
        let mut rng = ScriptedUniform::new(vec![0.8, 0.25]);
        assert_eq!(rng.pick_index(1), Some(0));
        assert_eq!(rng.consumed(), 1);
        assert_eq!(rng.pick_index(4), Some(1));
        assert_eq!(rng.consumed(), 2);
        assert_eq!(rng.pick_index(0), None);
        assert_eq!(rng.consumed(), 2);
    }

    #[test]
    fn scripted_values_are_clamped_and_cycle() {
        let mut rng = ScriptedUniform::new(vec![1.5, -0.2, f64::NAN]);
        assert!(rng.next_uniform() < 1.0);
        assert!(rng.next_uniform().abs() <= f64::EPSILON);
        assert!(rng.next_uniform().abs() <= f64::EPSILON);
        assert!(rng.next_uniform() < 1.0);
        assert_eq!(rng.consumed(), 4);
    }

    #[test]
    fn seeded_sources_are_reproducible_and_counted() {
        let mut a = SimRng::from_user_seed(1337);
        let mut b = SimRng::from_user_seed(1337);
        for _ in 0..16 {
            let value = a.next_uniform();
            assert!((0.0..1.0).contains(&value));
            assert!((value - b.next_uniform()).abs() <= f64::EPSILON);
        }
        assert_eq!(a.draws(), 16);
    }

    #[test]
    fn chance_uses_strict_comparison() {
        let mut rng = ScriptedUniform::constant(0.15);
        assert!(!rng.chance(0.15));
        assert!(rng.chance(0.16));
    }
}
