//! Neighbourhood tables for grid proximity checks.
//!
//! A table lists the relative cell offsets that may hold a point closer than the
//! minimum distance to any point of the origin cell, when the cell size is
//! `distance / sqrt(N)`. Offsets are sorted by ascending distance so that the most
//! likely rejections are found first.
//!
//! Such a point can lie up to `ceil(sqrt(N))` cells away along a single axis, so the
//! table is cut from a Moore neighbourhood of that radius (never less than 2).
//!
//! Tables depend only on the dimension. They are built once per dimension and kept
//! in a process-wide cache for the lifetime of the process.
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::error::{Error, Result};

/// Smallest Chebyshev radius of the Moore neighbourhood the table is cut from.
const MIN_RANGE: isize = 2;

/// Largest number of offsets a table may hold. Enough for up to 7 dimensions.
pub const MAX_OFFSETS: usize = 1 << 18;

/// Sorted cell offsets around an origin cell, including the origin itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbourhood {
    dimension: usize,
    offsets: Vec<isize>,
}

impl Neighbourhood {
    /// Builds the table for `dimension` axes without consulting the cache.
    ///
    /// Fails for a zero dimension, or when the table would exceed [`MAX_OFFSETS`].
    pub fn build(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::InvalidConfig("dimension must be > 0".into()));
        }

        // Every offset in {-1, 0, 1}^N is kept, so 3^N bounds the table from below.
        let too_large = || {
            Error::InvalidConfig(format!(
                "neighbourhood for {dimension} dimensions exceeds {MAX_OFFSETS} cells"
            ))
        };
        match u32::try_from(dimension).ok().and_then(|d| 3usize.checked_pow(d)) {
            Some(lower_bound) if lower_bound <= MAX_OFFSETS => {}
            _ => return Err(too_large()),
        }

        let range = range_for(dimension);
        let mut candidates: Vec<isize> = Vec::new();
        let mut offset = Vec::with_capacity(dimension);
        collect(&mut offset, 0, dimension, range, &mut candidates).map_err(|_| too_large())?;

        let mut order: Vec<&[isize]> = candidates.chunks_exact(dimension).collect();
        order.sort_by_key(|offset| squared_norm(offset));

        Ok(Self {
            dimension,
            offsets: order.concat(),
        })
    }

    /// Returns the cached table for `dimension`, building it on first use.
    pub fn for_dimension(dimension: usize) -> Result<Arc<Self>> {
        static CACHE: OnceLock<Mutex<HashMap<usize, Arc<Neighbourhood>>>> = OnceLock::new();

        let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        let mut entries = cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = entries.get(&dimension) {
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(Self::build(dimension)?);
        entries.insert(dimension, Arc::clone(&table));
        Ok(table)
    }

    /// Number of axes of each offset.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of offsets in the table.
    pub fn len(&self) -> usize {
        self.offsets.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Iterates over the offsets, nearest first.
    pub fn iter(&self) -> impl Iterator<Item = &[isize]> + '_ {
        self.offsets.chunks_exact(self.dimension)
    }
}

/// Chebyshev radius needed for `dimension` axes.
fn range_for(dimension: usize) -> isize {
    let mut range = MIN_RANGE;
    while ((range * range) as usize) < dimension {
        range += 1;
    }
    range
}

/// Smallest squared distance between the origin cell and the cell at `o` along one
/// axis, in cell units.
#[inline]
fn axis_gap(o: isize) -> usize {
    let g = (o.abs() - 1).max(0) as usize;
    g * g
}

/// Table size limit reached while collecting offsets.
struct TooManyOffsets;

/// Appends every completion of `offset` whose cells may hold a point closer than
/// `sqrt(N)` cells to the flat `out`, pruning as soon as the partial gap reaches
/// that bound.
fn collect(
    offset: &mut Vec<isize>,
    gap: usize,
    dimension: usize,
    range: isize,
    out: &mut Vec<isize>,
) -> std::result::Result<(), TooManyOffsets> {
    if offset.len() == dimension {
        if out.len() / dimension == MAX_OFFSETS {
            return Err(TooManyOffsets);
        }
        out.extend_from_slice(offset);
        return Ok(());
    }

    for o in -range..=range {
        let gap = gap + axis_gap(o);
        if gap >= dimension {
            continue;
        }
        offset.push(o);
        let result = collect(offset, gap, dimension, range, out);
        offset.pop();
        result?;
    }
    Ok(())
}

fn squared_norm(offset: &[isize]) -> isize {
    offset.iter().map(|&o| o * o).sum()
}
