//! Dense N-dimensional spatial grid used to accelerate proximity checks.
//!
//! The grid splits the domain into cubic cells of a fixed size and maps each cell
//! to a row-major index through a stride vector. Cells hold references to accepted
//! points by their index in the sample collection.
//!
//! Two cell types are used:
//! - [`PointSlot`]: at most one point per cell, for fixed density sampling;
//! - `Vec<usize>`: any number of points per cell, for variable density sampling.
use std::num::NonZeroUsize;

use crate::error::{Error, Result};

pub mod neighbourhood;

pub use neighbourhood::Neighbourhood;

/// Single-point cell storing `index + 1`; `None` is an empty cell.
pub type PointSlot = Option<NonZeroUsize>;

/// Dense grid over an N-dimensional domain.
#[derive(Debug, Clone)]
pub struct SpatialGrid<C> {
    cell_size: f64,
    shape: Vec<usize>,
    stride: Vec<usize>,
    cells: Vec<C>,
}

impl<C: Default + Clone> SpatialGrid<C> {
    /// Creates a grid covering `extent` with cells of `cell_size`.
    pub fn new(extent: &[f64], cell_size: f64) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "grid cell size must be finite and > 0, got {cell_size}"
            )));
        }

        let shape: Vec<usize> = extent
            .iter()
            .map(|&e| ((e / cell_size).ceil() as usize).max(1))
            .collect();

        let mut stride = vec![0; shape.len()];
        let mut total: usize = 1;
        for d in (0..shape.len()).rev() {
            stride[d] = total;
            total = total.checked_mul(shape[d]).ok_or_else(|| {
                Error::InvalidConfig(format!("grid of shape {shape:?} is too large"))
            })?;
        }

        Ok(Self {
            cell_size,
            shape,
            stride,
            cells: vec![C::default(); total],
        })
    }

    /// Empties every cell.
    pub fn reset(&mut self) {
        self.cells.fill(C::default());
    }
}

impl<C> SpatialGrid<C> {
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of cells along each axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Row-major strides; the last axis is contiguous.
    pub fn stride(&self) -> &[usize] {
        &self.stride
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell coordinate of `value` along axis `d`, clamped into the grid.
    #[inline]
    fn axis_cell(&self, d: usize, value: f64) -> usize {
        let max = self.shape[d] as isize - 1;
        ((value / self.cell_size).floor() as isize).clamp(0, max) as usize
    }

    /// Cell coordinates of `point`.
    pub fn cell_coords(&self, point: &[f64]) -> Vec<usize> {
        point
            .iter()
            .enumerate()
            .map(|(d, &v)| self.axis_cell(d, v))
            .collect()
    }

    /// Flat index of the cell containing `point`.
    pub fn cell_index_of(&self, point: &[f64]) -> usize {
        point
            .iter()
            .enumerate()
            .map(|(d, &v)| self.axis_cell(d, v) * self.stride[d])
            .sum()
    }

    /// Flat index of the cell at `coords + offset`, or `None` outside the grid.
    pub fn neighbour_index(&self, coords: &[usize], offset: &[isize]) -> Option<usize> {
        let mut index = 0;
        for (d, (&c, &o)) in coords.iter().zip(offset).enumerate() {
            let v = c as isize + o;
            if v < 0 || v >= self.shape[d] as isize {
                return None;
            }
            index += v as usize * self.stride[d];
        }
        Some(index)
    }

    pub fn cell(&self, index: usize) -> &C {
        &self.cells[index]
    }

    pub fn cell_mut(&mut self, index: usize) -> &mut C {
        &mut self.cells[index]
    }
}
