//! Isotropic random directions in N dimensions.
use std::f64::consts::TAU;

use glam::DVec2;

use crate::sampling::RandomSource;

/// Random unit vector for spawning candidates around a point.
///
/// The 2D case samples an angle directly; other dimensions go through
/// [`unit_vector`].
pub fn random_direction(dimension: usize, random: &mut dyn RandomSource) -> Vec<f64> {
    if dimension == 2 {
        let v = DVec2::from_angle(random.next_f64() * TAU);
        return vec![v.x, v.y];
    }

    unit_vector(dimension, random)
}

/// Unit vector uniformly distributed on the N-sphere.
///
/// Draws N standard normal variates with the Box-Muller transform, using both
/// outputs of each pair plus one extra half-pair for odd N, and normalises the result.
pub fn unit_vector(dimension: usize, random: &mut dyn RandomSource) -> Vec<f64> {
    let mut v = vec![0.0; dimension];
    let pairs = dimension / 2 * 2;
    let mut squared_norm = 0.0;

    for i in (0..pairs).step_by(2) {
        let rr = -2.0 * (1.0 - random.next_f64()).ln();
        let r = rr.sqrt();
        let theta = TAU * random.next_f64();
        squared_norm += rr;
        v[i] = r * theta.cos();
        v[i + 1] = r * theta.sin();
    }

    if dimension % 2 == 1 {
        let x = (-2.0 * (1.0 - random.next_f64()).ln()).sqrt() * (TAU * random.next_f64()).cos();
        v[dimension - 1] = x;
        squared_norm += x * x;
    }

    let scale = 1.0 / squared_norm.sqrt();
    for c in &mut v {
        *c *= scale;
    }
    v
}
