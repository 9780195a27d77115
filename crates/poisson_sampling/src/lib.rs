#![forbid(unsafe_code)]
//! poisson_sampling: N-dimensional Poisson disk sampling with fixed or variable density.
//!
//! Modules:
//! - options: sampling configuration and the distance function
//! - grid: background acceleration grid and neighbourhood offsets
//! - sampling: random sources, direction sampling, the density engines and the facade
//! - point: sample point type with `glam`/`mint` conversions
//!
//! For examples and docs, see README and docs.rs.
pub mod error;
pub mod grid;
pub mod options;
pub mod point;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use poisson_sampling::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::grid::{Neighbourhood, SpatialGrid};
    pub use crate::options::{DistanceFunction, SamplingOptions, DEFAULT_TRIES};
    pub use crate::point::Point;
    pub use crate::sampling::{
        FixedDensitySampler, PoissonDiskSampling, RandomSource, RngSource, Sampler,
        VariableDensitySampler,
    };
}
