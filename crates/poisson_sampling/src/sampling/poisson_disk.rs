//! Poisson disk sampling entry point.
//!
//! [`PoissonDiskSampling`] picks the fixed or variable density engine once, at
//! construction, depending on whether the options carry a distance function, and
//! forwards every operation to it.
//!
//! ```
//! use poisson_sampling::prelude::*;
//!
//! let options = SamplingOptions::new([50.0, 30.0], 4.0).with_tries(10);
//! let mut pds = PoissonDiskSampling::seeded(&options, 7).unwrap();
//! let points = pds.fill();
//! assert!(!points.is_empty());
//! ```
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::Result;
use crate::options::SamplingOptions;
use crate::point::Point;
use crate::sampling::{
    FixedDensitySampler, RandomSource, RngSource, Sampler, VariableDensitySampler,
};

#[derive(Debug)]
enum Engine {
    Fixed(FixedDensitySampler),
    Variable(VariableDensitySampler),
}

impl Engine {
    fn sampler(&self) -> &dyn Sampler {
        match self {
            Engine::Fixed(s) => s,
            Engine::Variable(s) => s,
        }
    }

    fn sampler_mut(&mut self) -> &mut dyn Sampler {
        match self {
            Engine::Fixed(s) => s,
            Engine::Variable(s) => s,
        }
    }
}

/// Poisson disk sampler over an N-dimensional domain.
///
/// Iterating the sampler is the step-wise form of [`fill`](Self::fill): each call to
/// `next` places at most one point and returns `None` once the active points are
/// exhausted.
#[derive(Debug)]
pub struct PoissonDiskSampling {
    shape: Vec<f64>,
    engine: Engine,
}

impl PoissonDiskSampling {
    /// Creates a sampler using a generator seeded from the thread-local RNG.
    pub fn new(options: &SamplingOptions) -> Result<Self> {
        let seed = rand::rng().next_u64();
        Self::seeded(options, seed)
    }

    /// Creates a sampler with a [`StdRng`] seeded from `seed`.
    pub fn seeded(options: &SamplingOptions, seed: u64) -> Result<Self> {
        Self::with_rng(options, StdRng::seed_from_u64(seed))
    }

    /// Creates a sampler drawing from `rng`.
    pub fn with_rng(options: &SamplingOptions, rng: impl Rng + Send + 'static) -> Result<Self> {
        Self::with_random_source(options, RngSource(rng))
    }

    /// Creates a sampler drawing from `source`, which must return values in `[0, 1)`.
    pub fn with_random_source(
        options: &SamplingOptions,
        source: impl RandomSource + Send + 'static,
    ) -> Result<Self> {
        let random: Box<dyn RandomSource + Send> = Box::new(source);
        let engine = match options.distance_function {
            Some(_) => Engine::Variable(VariableDensitySampler::new(options, random)?),
            None => Engine::Fixed(FixedDensitySampler::new(options, random)?),
        };

        debug!(
            "Poisson disk sampling over {:?} ({} density).",
            options.shape,
            if matches!(engine, Engine::Variable(_)) {
                "variable"
            } else {
                "fixed"
            }
        );

        Ok(Self {
            shape: options.shape.clone(),
            engine,
        })
    }

    /// Domain extents.
    pub fn shape(&self) -> &[f64] {
        &self.shape
    }

    pub fn dimension(&self) -> usize {
        self.shape.len()
    }

    /// Whether the sampler follows a distance function.
    pub fn is_variable_density(&self) -> bool {
        matches!(self.engine, Engine::Variable(_))
    }

    /// Number of accepted points.
    pub fn len(&self) -> usize {
        self.get_all_points().len()
    }

    pub fn is_empty(&self) -> bool {
        self.get_all_points().is_empty()
    }

    /// Adds a uniformly random point, ignoring the distance constraint.
    pub fn add_random_point(&mut self) -> Point {
        self.engine.sampler_mut().add_random_point()
    }

    /// Adds `point`, ignoring the distance constraint.
    ///
    /// Returns `None` without changing anything if the point has the wrong dimension
    /// or lies outside `[0, shape[d])`.
    pub fn add_point(&mut self, point: &[f64]) -> Option<Point> {
        self.engine.sampler_mut().add_point(point)
    }

    /// Fills the domain, adding a random point first if there is none.
    ///
    /// Runs until no active point can spawn a new one, which may take a long time
    /// for large domains. Use the iterator form to sample incrementally.
    pub fn fill(&mut self) -> &[Point] {
        self.engine.sampler_mut().fill()
    }

    /// All accepted points, in insertion order.
    pub fn get_all_points(&self) -> &[Point] {
        self.engine.sampler().get_all_points()
    }

    /// All accepted points with their distance field value appended.
    ///
    /// Fails with [`Error::Unsupported`](crate::error::Error::Unsupported) without a
    /// distance function.
    pub fn get_all_points_with_distance(&self) -> Result<Vec<Point>> {
        self.engine.sampler().get_all_points_with_distance()
    }

    /// Clears all points and the sampling state.
    pub fn reset(&mut self) {
        self.engine.sampler_mut().reset();
    }

    /// Consumes the sampler and returns its points.
    pub fn into_points(self) -> Vec<Point> {
        match self.engine {
            Engine::Fixed(s) => s.into_points(),
            Engine::Variable(s) => s.into_points(),
        }
    }
}

impl Iterator for PoissonDiskSampling {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        self.engine.sampler_mut().next_point()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::error::Error;
    use crate::sampling::tests::{assert_in_shape, nearest_neighbour_range};

    fn fixed_options() -> SamplingOptions {
        SamplingOptions::new([50.0, 30.0], 4.0)
            .with_max_distance(8.0)
            .with_tries(10)
    }

    fn variable_options() -> SamplingOptions {
        fixed_options().with_distance_function(|p| p[1] / 30.0)
    }

    #[test]
    fn dispatches_on_distance_function() {
        let fixed = PoissonDiskSampling::seeded(&fixed_options(), 1).expect("valid");
        assert!(!fixed.is_variable_density());

        let variable = PoissonDiskSampling::seeded(&variable_options(), 1).expect("valid");
        assert!(variable.is_variable_density());
    }

    #[test]
    fn variable_density_with_equal_distances() {
        let options = SamplingOptions::new([20.0, 20.0], 4.0)
            .with_max_distance(4.0)
            .with_tries(10)
            .with_distance_function(|p| p[0] / 20.0);
        let mut pds = PoissonDiskSampling::seeded(&options, 2).expect("valid");
        pds.fill();
        assert!(pds.get_all_points_with_distance().is_ok());
    }

    #[test]
    fn invalid_options_fail_construction() {
        let options = SamplingOptions::new([50.0, 30.0], 4.0).with_max_distance(1.0);
        assert!(matches!(
            PoissonDiskSampling::new(&options),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_after_construction() {
        for options in [fixed_options(), variable_options()] {
            let pds = PoissonDiskSampling::new(&options).expect("valid");
            assert!(pds.get_all_points().is_empty());
            assert!(pds.is_empty());
            assert_eq!(pds.shape(), &[50.0, 30.0]);
            assert_eq!(pds.dimension(), 2);
        }
    }

    #[test]
    fn add_point_accepts_and_rejects() {
        for options in [fixed_options(), variable_options()] {
            let mut pds = PoissonDiskSampling::seeded(&options, 3).expect("valid");
            assert_eq!(pds.add_point(&[10.0, 15.0]), Some(Point::from([10.0, 15.0])));
            assert_eq!(pds.add_point(&[10.0]), None);
            assert_eq!(pds.add_point(&[-5.0, 10.0]), None);
            assert_eq!(pds.len(), 1);
        }
    }

    #[test]
    fn fill_and_iterator_agree() {
        for options in [fixed_options(), variable_options()] {
            let mut filled = PoissonDiskSampling::seeded(&options, 4).expect("valid");
            let expected = filled.fill().to_vec();

            let mut stepped = PoissonDiskSampling::seeded(&options, 4).expect("valid");
            let seed = stepped.add_random_point();
            let mut points = vec![seed];
            points.extend(stepped.by_ref());

            assert_eq!(points, expected);
            assert_eq!(stepped.get_all_points(), expected.as_slice());
            assert_eq!(stepped.next(), None);
        }
    }

    #[test]
    fn iteration_can_stop_early() {
        let mut pds = PoissonDiskSampling::seeded(&fixed_options(), 5).expect("valid");
        pds.add_point(&[25.0, 15.0]);
        let first: Vec<Point> = pds.by_ref().take(3).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(pds.len(), 4);

        // Resuming completes the same session.
        let rest = pds.by_ref().count();
        assert_eq!(pds.len(), 4 + rest);
        let (min, _) = nearest_neighbour_range(pds.get_all_points());
        assert!(min >= 4.0 - 5e-14);
    }

    #[test]
    fn reset_leaves_snapshots_alone() {
        for options in [fixed_options(), variable_options()] {
            let mut pds = PoissonDiskSampling::seeded(&options, 6).expect("valid");
            let snapshot = pds.fill().to_vec();
            pds.reset();
            assert!(pds.get_all_points().is_empty());
            assert!(!snapshot.is_empty());
            assert_in_shape(&snapshot, &[50.0, 30.0]);
        }
    }

    #[test]
    fn distance_query_depends_on_mode() {
        let mut fixed = PoissonDiskSampling::seeded(&fixed_options(), 7).expect("valid");
        fixed.fill();
        assert!(matches!(
            fixed.get_all_points_with_distance(),
            Err(Error::Unsupported(_))
        ));

        let mut variable = PoissonDiskSampling::seeded(&variable_options(), 7).expect("valid");
        let count = variable.fill().len();
        let with_distance = variable.get_all_points_with_distance().expect("supported");
        assert_eq!(with_distance.len(), count);
        assert!(with_distance.iter().all(|p| p.len() == 3));
    }

    #[test]
    fn same_rng_gives_same_points() {
        for options in [fixed_options(), variable_options()] {
            let a = PoissonDiskSampling::with_rng(&options, StdRng::seed_from_u64(99))
                .expect("valid")
                .fill()
                .to_vec();
            let b = PoissonDiskSampling::with_rng(&options, StdRng::seed_from_u64(99))
                .expect("valid")
                .fill()
                .to_vec();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn closure_source_is_used() {
        let mut pds =
            PoissonDiskSampling::with_random_source(&fixed_options(), || 0.5).expect("valid");
        assert_eq!(pds.add_random_point().coords(), &[25.0, 15.0]);
    }

    #[test]
    fn no_room_for_second_point() {
        let options = SamplingOptions::new([2.0, 2.0], 8.0)
            .with_max_distance(8.0)
            .with_tries(20);
        let mut pds = PoissonDiskSampling::seeded(&options, 8).expect("valid");
        pds.add_point(&[1.0, 1.0]);
        assert_eq!(pds.next(), None);
        assert_eq!(pds.len(), 1);
    }

    #[test]
    fn into_points_returns_collection() {
        let mut pds = PoissonDiskSampling::seeded(&fixed_options(), 9).expect("valid");
        let expected = pds.fill().to_vec();
        assert_eq!(pds.into_points(), expected);
    }
}
