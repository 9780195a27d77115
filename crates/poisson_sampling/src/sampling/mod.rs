//! Poisson disk sampling engines over an N-dimensional domain.
//!
//! This module defines the [`Sampler`] capability shared by the fixed and variable
//! density engines, the [`RandomSource`] strategy the engines draw from, and the
//! [`PoissonDiskSampling`] facade that picks an engine from the options.
use rand::Rng;
use tracing::debug;

use crate::error::Result;
use crate::point::Point;
use crate::sampling::direction::random_direction;

pub mod direction;
pub mod fixed_density;
pub mod poisson_disk;
pub mod variable_density;

pub use fixed_density::FixedDensitySampler;
pub use poisson_disk::PoissonDiskSampling;
pub use variable_density::VariableDensitySampler;

/// Source of uniform random numbers.
///
/// Every call must return a fresh value in `[0, 1)`. Samplers call it strictly
/// sequentially. Any `FnMut() -> f64` closure is a source.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl<F> RandomSource for F
where
    F: FnMut() -> f64,
{
    fn next_f64(&mut self) -> f64 {
        self()
    }
}

/// Adapts a [`rand::Rng`] generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_f64(&mut self) -> f64 {
        rand01(&mut self.0)
    }
}

/// Generate a random float in the range [0, 1) with 53 bits of precision.
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Compute the next smaller representable float value.
///
/// Used to keep uniformly drawn coordinates strictly below the domain extent when
/// `u * extent` rounds up to `extent`.
#[inline]
pub(crate) fn next_down(val: f64) -> f64 {
    if val.is_nan() {
        return f64::NAN;
    }

    if val == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }

    if val == f64::INFINITY {
        return f64::MAX;
    }

    if val == 0.0 {
        return -f64::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f64::from_bits(bits.saturating_sub(1))
    } else {
        f64::from_bits(bits.saturating_add(1))
    }
}

/// Uniform point inside `[0, shape[d])`.
pub(crate) fn random_point(shape: &[f64], random: &mut dyn RandomSource) -> Vec<f64> {
    shape
        .iter()
        .map(|&extent| (random.next_f64() * extent).clamp(0.0, next_down(extent)))
        .collect()
}

/// Candidate at `distance` from `origin` in a random direction.
///
/// Returns `None` if the candidate falls outside `[0, shape[d])` on any axis.
pub(crate) fn spawn_candidate(
    origin: &[f64],
    distance: f64,
    shape: &[f64],
    random: &mut dyn RandomSource,
) -> Option<Vec<f64>> {
    let mut candidate = random_direction(shape.len(), random);
    for (d, c) in candidate.iter_mut().enumerate() {
        *c = origin[d] + *c * distance;
        if !(*c >= 0.0 && *c < shape[d]) {
            return None;
        }
    }
    Some(candidate)
}

/// Operations shared by the sampling engines.
pub trait Sampler {
    /// Adds a uniformly random point without checking the distance constraint.
    fn add_random_point(&mut self) -> Point;

    /// Adds `point` without checking the distance constraint.
    ///
    /// Returns `None`, leaving the sampler untouched, if the point has the wrong
    /// dimension or lies outside the domain.
    fn add_point(&mut self, point: &[f64]) -> Option<Point>;

    /// Tries to place one new point around the active points.
    ///
    /// Returns `None` once no active point is left.
    fn next_point(&mut self) -> Option<Point>;

    /// All accepted points, in insertion order.
    fn get_all_points(&self) -> &[Point];

    /// All accepted points, each followed by its distance field value.
    fn get_all_points_with_distance(&self) -> Result<Vec<Point>>;

    /// Clears all points and internal state.
    fn reset(&mut self);

    /// Fills the domain, seeding with a random point if the sampler is empty.
    ///
    /// Blocks until every active point is exhausted.
    fn fill(&mut self) -> &[Point] {
        if self.get_all_points().is_empty() {
            self.add_random_point();
        }

        let mut added = 0usize;
        while self.next_point().is_some() {
            added += 1;
        }

        debug!(
            "Fill complete: {} points added, {} total.",
            added,
            self.get_all_points().len()
        );
        self.get_all_points()
    }
}
