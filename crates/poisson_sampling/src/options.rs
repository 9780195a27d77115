//! Sampling configuration.
//!
//! [`SamplingOptions`] collects the domain shape and distance parameters of a sampling
//! session. Supplying a [`DistanceFunction`] switches the session to variable density.
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Default number of placement attempts around each active point.
pub const DEFAULT_TRIES: usize = 30;

/// Position-dependent distance field used by variable density sampling.
///
/// The function maps a point to a value in `[0, 1]`: `0` asks for the minimum
/// distance around that point, `1` for the maximum distance. Results outside the
/// range are clamped and NaN is read as `0`.
#[derive(Clone)]
pub struct DistanceFunction(Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>);

impl DistanceFunction {
    pub fn new(f: impl Fn(&[f64]) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluates the field at `point`, clamped into `[0, 1]`.
    pub fn evaluate(&self, point: &[f64]) -> f64 {
        let value = (self.0)(point);
        if value.is_nan() {
            warn!("Distance function returned NaN at {:?}; using 0.", point);
            return 0.0;
        }
        value.clamp(0.0, 1.0)
    }
}

impl fmt::Debug for DistanceFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DistanceFunction(..)")
    }
}

/// Configuration of a Poisson disk sampling session.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplingOptions {
    /// Extent of the domain along each axis. Points lie in `[0, shape[d])`.
    pub shape: Vec<f64>,
    /// Minimum distance between two points.
    pub min_distance: f64,
    /// Maximum distance used when spawning candidates. Defaults to `2 * min_distance`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_distance: Option<f64>,
    /// Placement attempts around each active point before it is retired.
    #[cfg_attr(feature = "serde", serde(default = "default_tries"))]
    pub tries: usize,
    /// Optional distance field; its presence selects variable density sampling.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub distance_function: Option<DistanceFunction>,
    /// Which of two neighbouring constraints wins: `0` the smaller distance, `1` the larger.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bias: f64,
}

#[cfg(feature = "serde")]
fn default_tries() -> usize {
    DEFAULT_TRIES
}

impl SamplingOptions {
    /// Creates options for the given domain shape and minimum distance.
    pub fn new(shape: impl Into<Vec<f64>>, min_distance: f64) -> Self {
        Self {
            shape: shape.into(),
            min_distance,
            max_distance: None,
            tries: DEFAULT_TRIES,
            distance_function: None,
            bias: 0.0,
        }
    }

    /// Sets the maximum distance.
    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    /// Sets the number of attempts per active point. Zero is raised to one.
    pub fn with_tries(mut self, tries: usize) -> Self {
        self.tries = tries.max(1);
        self
    }

    /// Sets the distance function, enabling variable density sampling.
    pub fn with_distance_function(
        mut self,
        f: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.distance_function = Some(DistanceFunction::new(f));
        self
    }

    /// Sets the bias, clamped into `[0, 1]`.
    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = clamp_bias(bias);
        self
    }

    /// Number of dimensions of the domain.
    pub fn dimension(&self) -> usize {
        self.shape.len()
    }

    /// Maximum distance after applying the default.
    pub fn resolved_max_distance(&self) -> f64 {
        self.max_distance.unwrap_or(self.min_distance * 2.0)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.shape.is_empty() {
            return Err(Error::InvalidConfig("shape must not be empty".into()));
        }
        if let Some(extent) = self.shape.iter().find(|e| !e.is_finite() || **e <= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "shape extents must be finite and > 0, got {extent}"
            )));
        }
        if !self.min_distance.is_finite() || self.min_distance <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "min_distance must be finite and > 0, got {}",
                self.min_distance
            )));
        }
        let max_distance = self.resolved_max_distance();
        if !max_distance.is_finite() || max_distance < self.min_distance {
            return Err(Error::InvalidConfig(format!(
                "max_distance must be finite and >= min_distance ({}), got {max_distance}",
                self.min_distance
            )));
        }

        Ok(())
    }

    /// Validates and derives the values the samplers work with.
    pub(crate) fn resolve(&self) -> Result<ResolvedOptions> {
        self.validate()?;

        let max_distance = self.resolved_max_distance();
        let max_extent = self.shape.iter().copied().fold(0.0_f64, f64::max);
        // Keeps candidates off the exact acceptance boundary; grows with coordinate magnitude.
        let epsilon = 1e-14 * (max_extent / 128.0).floor().max(1.0);
        let min_distance_plus_epsilon = self.min_distance + epsilon;

        Ok(ResolvedOptions {
            shape: self.shape.clone(),
            min_distance: self.min_distance,
            max_distance,
            min_distance_plus_epsilon,
            delta_distance: (max_distance - min_distance_plus_epsilon).max(0.0),
            max_tries: self.tries.max(1),
            bias: clamp_bias(self.bias),
        })
    }
}

fn clamp_bias(bias: f64) -> f64 {
    if bias.is_nan() {
        0.0
    } else {
        bias.clamp(0.0, 1.0)
    }
}

/// Validated parameters shared by both samplers.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedOptions {
    pub shape: Vec<f64>,
    pub min_distance: f64,
    pub max_distance: f64,
    pub min_distance_plus_epsilon: f64,
    pub delta_distance: f64,
    pub max_tries: usize,
    pub bias: f64,
}

impl ResolvedOptions {
    pub fn dimension(&self) -> usize {
        self.shape.len()
    }

    /// Whether `point` has the right dimension and lies in `[0, shape[d])` on every axis.
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.shape.len()
            && point
                .iter()
                .zip(&self.shape)
                .all(|(&x, &extent)| x >= 0.0 && x < extent)
    }
}
