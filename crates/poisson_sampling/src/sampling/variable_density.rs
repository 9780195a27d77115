//! Variable density Poisson disk sampling.
//!
//! Each point carries a local distance value in `[0, 1]` read from a caller-supplied
//! [`DistanceFunction`]. Two points must be at least
//! `min_distance + delta_distance * blend(a, b, bias)` apart, where `blend` moves from
//! the smaller of the two values (`bias = 0`) to the larger one (`bias = 1`).
//!
//! The grid cell size is `max_distance / sqrt(N)`, so a cell may hold several points
//! where the local distance is small.
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::grid::{Neighbourhood, SpatialGrid};
use crate::options::{DistanceFunction, ResolvedOptions, SamplingOptions};
use crate::point::Point;
use crate::sampling::{random_point, spawn_candidate, RandomSource, Sampler};

/// Interpolates between the smaller and larger of `a` and `b`.
#[inline]
pub fn blend(a: f64, b: f64, bias: f64) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    lo + (hi - lo) * bias
}

/// Sampler whose spacing follows a position-dependent distance field.
pub struct VariableDensitySampler {
    options: ResolvedOptions,
    distance_function: DistanceFunction,
    neighbourhood: Arc<Neighbourhood>,
    grid: SpatialGrid<Vec<usize>>,
    sample_points: Vec<Point>,
    sample_distance: Vec<f64>,
    process_list: VecDeque<usize>,
    current_point: Option<usize>,
    random: Box<dyn RandomSource + Send>,
}

impl VariableDensitySampler {
    /// Creates a sampler drawing from `random`.
    ///
    /// Fails if the options carry no distance function or are invalid.
    pub fn new(options: &SamplingOptions, random: Box<dyn RandomSource + Send>) -> Result<Self> {
        let distance_function = options
            .distance_function
            .clone()
            .ok_or(Error::MissingDistanceFunction)?;

        let options = options.resolve()?;
        let dimension = options.dimension();
        let cell_size = options.max_distance / (dimension as f64).sqrt();
        let grid = SpatialGrid::new(&options.shape, cell_size)?;

        debug!(
            "Variable density sampler: {} dimensions, {} grid cells, distance {}..{}, bias {}.",
            dimension,
            grid.len(),
            options.min_distance,
            options.max_distance,
            options.bias
        );

        Ok(Self {
            distance_function,
            neighbourhood: Neighbourhood::for_dimension(dimension)?,
            grid,
            sample_points: Vec::new(),
            sample_distance: Vec::new(),
            process_list: VecDeque::new(),
            current_point: None,
            random,
            options,
        })
    }

    pub fn dimension(&self) -> usize {
        self.options.dimension()
    }

    pub fn shape(&self) -> &[f64] {
        &self.options.shape
    }

    pub fn bias(&self) -> f64 {
        self.options.bias
    }

    /// Number of points still waiting to spawn children, including the one in progress.
    pub fn active_len(&self) -> usize {
        self.process_list.len() + usize::from(self.current_point.is_some())
    }

    /// Cached distance field values, parallel to the sample points.
    pub fn sample_distances(&self) -> &[f64] {
        &self.sample_distance
    }

    /// Consumes the sampler and returns its points.
    pub fn into_points(self) -> Vec<Point> {
        self.sample_points
    }

    fn direct_add_point(&mut self, coords: Vec<f64>, distance: f64) -> Point {
        let index = self.sample_points.len();
        let cell = self.grid.cell_index_of(&coords);
        self.grid.cell_mut(cell).push(index);

        let point = Point::new(coords);
        self.process_list.push_back(index);
        self.sample_points.push(point.clone());
        self.sample_distance.push(distance);
        point
    }

    /// Whether an accepted point lies closer to `point` than their blended distance allows.
    fn in_neighbourhood(&self, point: &[f64], distance: f64) -> bool {
        let coords = self.grid.cell_coords(point);

        self.neighbourhood
            .iter()
            .filter_map(|offset| self.grid.neighbour_index(&coords, offset))
            .flat_map(|cell| self.grid.cell(cell))
            .any(|&index| {
                let limit = self.options.min_distance
                    + self.options.delta_distance
                        * blend(self.sample_distance[index], distance, self.options.bias);
                self.sample_points[index].squared_distance(point) < limit * limit
            })
    }
}

impl Sampler for VariableDensitySampler {
    fn add_random_point(&mut self) -> Point {
        let coords = random_point(&self.options.shape, self.random.as_mut());
        let distance = self.distance_function.evaluate(&coords);
        self.direct_add_point(coords, distance)
    }

    fn add_point(&mut self, point: &[f64]) -> Option<Point> {
        if !self.options.contains(point) {
            trace!("Rejected point {:?} outside shape {:?}.", point, self.options.shape);
            return None;
        }

        let distance = self.distance_function.evaluate(point);
        Some(self.direct_add_point(point.to_vec(), distance))
    }

    fn next_point(&mut self) -> Option<Point> {
        while let Some(current) = self.current_point.or_else(|| self.process_list.pop_front()) {
            self.current_point = Some(current);

            let current_distance = self.sample_distance[current];
            let spawn_distance = self.options.min_distance_plus_epsilon
                + self.options.delta_distance
                    * (current_distance + (1.0 - current_distance) * self.options.bias);

            for _ in 0..self.options.max_tries {
                let candidate = spawn_candidate(
                    &self.sample_points[current],
                    spawn_distance,
                    &self.options.shape,
                    self.random.as_mut(),
                );

                if let Some(candidate) = candidate {
                    let distance = self.distance_function.evaluate(&candidate);
                    if !self.in_neighbourhood(&candidate, distance) {
                        return Some(self.direct_add_point(candidate, distance));
                    }
                }
            }

            self.current_point = None;
        }

        None
    }

    fn get_all_points(&self) -> &[Point] {
        &self.sample_points
    }

    fn get_all_points_with_distance(&self) -> Result<Vec<Point>> {
        Ok(self
            .sample_points
            .iter()
            .zip(&self.sample_distance)
            .map(|(point, &distance)| {
                let mut coords = Vec::with_capacity(point.len() + 1);
                coords.extend_from_slice(point);
                coords.push(distance);
                Point::new(coords)
            })
            .collect())
    }

    fn reset(&mut self) {
        self.grid.reset();
        self.sample_points = Vec::new();
        self.sample_distance = Vec::new();
        self.process_list.clear();
        self.current_point = None;
    }
}

impl fmt::Debug for VariableDensitySampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableDensitySampler")
            .field("shape", &self.options.shape)
            .field("min_distance", &self.options.min_distance)
            .field("max_distance", &self.options.max_distance)
            .field("max_tries", &self.options.max_tries)
            .field("bias", &self.options.bias)
            .field("points", &self.sample_points.len())
            .field("active", &self.active_len())
            .finish_non_exhaustive()
    }
}
