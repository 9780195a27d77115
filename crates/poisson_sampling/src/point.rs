//! N-dimensional sample points.
//!
//! [`Point`] owns its coordinates and dereferences to `[f64]`, so it can be passed
//! wherever a coordinate slice is expected. Conversions to and from `glam` and `mint`
//! vectors are provided for the 2D and 3D cases.
use std::ops::Deref;

use glam::{DVec2, DVec3};
use mint::{Vector2, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A point in an N-dimensional domain.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Point(Vec<f64>);

impl Point {
    /// Creates a point from its coordinates.
    pub fn new(coords: Vec<f64>) -> Self {
        Self(coords)
    }

    /// Number of coordinates.
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Coordinates as a slice.
    pub fn coords(&self) -> &[f64] {
        &self.0
    }

    /// Consumes the point and returns its coordinates.
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Squared euclidean distance to `other`. Extra coordinates on either side are ignored.
    pub fn squared_distance(&self, other: &[f64]) -> f64 {
        squared_distance(&self.0, other)
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &[f64]) -> f64 {
        self.squared_distance(other).sqrt()
    }

    fn expect_dimension(&self, expected: usize) -> Result<()> {
        if self.0.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: self.0.len(),
            });
        }
        Ok(())
    }
}

#[inline]
pub(crate) fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

impl Deref for Point {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl AsRef<[f64]> for Point {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Point {
    fn from(value: Vec<f64>) -> Self {
        Self(value)
    }
}

impl From<&[f64]> for Point {
    fn from(value: &[f64]) -> Self {
        Self(value.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Point {
    fn from(value: [f64; N]) -> Self {
        Self(value.to_vec())
    }
}

impl From<Point> for Vec<f64> {
    fn from(value: Point) -> Self {
        value.0
    }
}

impl From<DVec2> for Point {
    fn from(value: DVec2) -> Self {
        Self(value.to_array().to_vec())
    }
}

impl From<DVec3> for Point {
    fn from(value: DVec3) -> Self {
        Self(value.to_array().to_vec())
    }
}

impl From<Vector2<f64>> for Point {
    fn from(value: Vector2<f64>) -> Self {
        Self(vec![value.x, value.y])
    }
}

impl From<Vector3<f64>> for Point {
    fn from(value: Vector3<f64>) -> Self {
        Self(vec![value.x, value.y, value.z])
    }
}

impl TryFrom<&Point> for DVec2 {
    type Error = Error;

    fn try_from(value: &Point) -> Result<Self> {
        value.expect_dimension(2)?;
        Ok(DVec2::from_slice(&value.0))
    }
}

impl TryFrom<&Point> for DVec3 {
    type Error = Error;

    fn try_from(value: &Point) -> Result<Self> {
        value.expect_dimension(3)?;
        Ok(DVec3::from_slice(&value.0))
    }
}

impl TryFrom<&Point> for Vector2<f64> {
    type Error = Error;

    fn try_from(value: &Point) -> Result<Self> {
        DVec2::try_from(value).map(Into::into)
    }
}

impl TryFrom<&Point> for Vector3<f64> {
    type Error = Error;

    fn try_from(value: &Point) -> Result<Self> {
        DVec3::try_from(value).map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_matches_pythagoras() {
        let a = Point::from([0.0, 0.0]);
        let b = Point::from([3.0, 4.0]);
        assert_eq!(a.squared_distance(&b), 25.0);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn derefs_to_coordinate_slice() {
        let p = Point::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(p.len(), 3);
        assert_eq!(p[1], 2.0);
        assert_eq!(p.dimension(), 3);
        assert_eq!(p.coords(), &[1.0, 2.0, 3.0]);
        assert_eq!(p.into_inner(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn glam_and_mint_conversions() {
        let p = Point::from(DVec2::new(1.5, -2.0));
        assert_eq!(p.coords(), &[1.5, -2.0]);

        let back = DVec2::try_from(&p).expect("2D point converts");
        assert_eq!(back, DVec2::new(1.5, -2.0));

        let m: Vector3<f64> = Vector3 {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        let p3 = Point::from(m);
        let back3 = Vector3::<f64>::try_from(&p3).expect("3D point converts");
        assert_eq!((back3.x, back3.y, back3.z), (1.0, 2.0, 3.0));
    }

    #[test]
    fn conversion_rejects_wrong_dimension() {
        let p = Point::from([1.0, 2.0, 3.0]);
        let err = DVec2::try_from(&p).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }
}
