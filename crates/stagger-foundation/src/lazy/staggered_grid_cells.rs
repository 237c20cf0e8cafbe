//! Lane configuration for staggered grids.

use super::{SlotSums, StaggeredGridError};

/// How the cross axis is divided into lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaggeredGridCells {
    /// Exactly this many lanes.
    Fixed(usize),

    /// As many lanes as fit with each at least `min_size` pixels wide, and
    /// never fewer than one.
    Adaptive(i32),
}

impl Default for StaggeredGridCells {
    fn default() -> Self {
        StaggeredGridCells::Fixed(2)
    }
}

impl StaggeredGridCells {
    /// Number of lanes for `available` cross-axis pixels.
    pub fn lane_count(&self, available: i32) -> Result<usize, StaggeredGridError> {
        match *self {
            StaggeredGridCells::Fixed(0) => Err(StaggeredGridError::NoLanes),
            StaggeredGridCells::Fixed(count) => Ok(count),
            StaggeredGridCells::Adaptive(min_size) if min_size <= 0 => {
                Err(StaggeredGridError::InvalidMinSize(min_size))
            }
            StaggeredGridCells::Adaptive(min_size) => {
                Ok((available.max(0) / min_size).max(1) as usize)
            }
        }
    }

    /// Resolves `available` cross-axis pixels into cumulative lane boundaries.
    pub fn resolve_slot_sums(&self, available: i32) -> Result<SlotSums, StaggeredGridError> {
        let count = self.lane_count(available)?;
        Ok(calculate_slot_sums(available.max(0), count))
    }
}

/// Splits `available` into `count` lanes; the first `available % count`
/// lanes get one extra pixel.
fn calculate_slot_sums(available: i32, count: usize) -> SlotSums {
    let lanes = i32::try_from(count).unwrap_or(i32::MAX);
    let base = available / lanes;
    let remainder = available % lanes;

    let mut sums = SlotSums::with_capacity(count);
    let mut total = 0;
    for lane in 0..lanes {
        total += base + i32::from(lane < remainder);
        sums.push(total);
    }
    sums
}
