//! Fixed density Poisson disk sampling (Bridson's algorithm).
use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::grid::{Neighbourhood, PointSlot, SpatialGrid};
use crate::options::{ResolvedOptions, SamplingOptions};
use crate::point::Point;
use crate::sampling::{random_point, spawn_candidate, RandomSource, Sampler};

/// Sampler with a single minimum distance over the whole domain.
///
/// The grid cell size is `min_distance / sqrt(N)`, so a cell holds at most one
/// accepted point.
pub struct FixedDensitySampler {
    options: ResolvedOptions,
    squared_min_distance: f64,
    neighbourhood: Arc<Neighbourhood>,
    grid: SpatialGrid<PointSlot>,
    sample_points: Vec<Point>,
    process_list: VecDeque<usize>,
    current_point: Option<usize>,
    random: Box<dyn RandomSource + Send>,
}

impl FixedDensitySampler {
    /// Creates a sampler drawing from `random`.
    ///
    /// Fails if the options carry a distance function or are invalid.
    pub fn new(options: &SamplingOptions, random: Box<dyn RandomSource + Send>) -> Result<Self> {
        if options.distance_function.is_some() {
            return Err(Error::DistanceFunctionNotAllowed);
        }

        let options = options.resolve()?;
        let dimension = options.dimension();
        let cell_size = options.min_distance / (dimension as f64).sqrt();
        let grid = SpatialGrid::new(&options.shape, cell_size)?;

        debug!(
            "Fixed density sampler: {} dimensions, {} grid cells, min distance {}.",
            dimension,
            grid.len(),
            options.min_distance
        );

        Ok(Self {
            squared_min_distance: options.min_distance * options.min_distance,
            neighbourhood: Neighbourhood::for_dimension(dimension)?,
            grid,
            sample_points: Vec::new(),
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

    /// Number of points still waiting to spawn children, including the one in progress.
    pub fn active_len(&self) -> usize {
        self.process_list.len() + usize::from(self.current_point.is_some())
    }

    /// Consumes the sampler and returns its points.
    pub fn into_points(self) -> Vec<Point> {
        self.sample_points
    }

    fn direct_add_point(&mut self, coords: Vec<f64>) -> Point {
        let index = self.sample_points.len();
        let cell = self.grid.cell_index_of(&coords);
        *self.grid.cell_mut(cell) = NonZeroUsize::new(index + 1);

        let point = Point::new(coords);
        self.process_list.push_back(index);
        self.sample_points.push(point.clone());
        point
    }

    /// Whether an accepted point lies closer than the minimum distance to `point`.
    fn in_neighbourhood(&self, point: &[f64]) -> bool {
        let coords = self.grid.cell_coords(point);

        self.neighbourhood.iter().any(|offset| {
            self.grid
                .neighbour_index(&coords, offset)
                .and_then(|cell| *self.grid.cell(cell))
                .is_some_and(|slot| {
                    self.sample_points[slot.get() - 1].squared_distance(point)
                        < self.squared_min_distance
                })
        })
    }
}

impl Sampler for FixedDensitySampler {
    fn add_random_point(&mut self) -> Point {
        let coords = random_point(&self.options.shape, self.random.as_mut());
        self.direct_add_point(coords)
    }

    fn add_point(&mut self, point: &[f64]) -> Option<Point> {
        if !self.options.contains(point) {
            trace!("Rejected point {:?} outside shape {:?}.", point, self.options.shape);
            return None;
        }

        Some(self.direct_add_point(point.to_vec()))
    }

    fn next_point(&mut self) -> Option<Point> {
        while let Some(current) = self.current_point.or_else(|| self.process_list.pop_front()) {
            self.current_point = Some(current);

            for _ in 0..self.options.max_tries {
                let distance = self.options.min_distance_plus_epsilon
                    + self.options.delta_distance * self.random.next_f64();
                let candidate = spawn_candidate(
                    &self.sample_points[current],
                    distance,
                    &self.options.shape,
                    self.random.as_mut(),
                );

                if let Some(candidate) = candidate {
                    if !self.in_neighbourhood(&candidate) {
                        return Some(self.direct_add_point(candidate));
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
        Err(Error::Unsupported(
            "get_all_points_with_distance requires a distance function",
        ))
    }

    fn reset(&mut self) {
        self.grid.reset();
        self.sample_points = Vec::new();
        self.process_list.clear();
        self.current_point = None;
    }
}

impl fmt::Debug for FixedDensitySampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedDensitySampler")
            .field("shape", &self.options.shape)
            .field("min_distance", &self.options.min_distance)
            .field("max_distance", &self.options.max_distance)
            .field("max_tries", &self.options.max_tries)
            .field("points", &self.sample_points.len())
            .field("active", &self.active_len())
            .finish_non_exhaustive()
    }
}
