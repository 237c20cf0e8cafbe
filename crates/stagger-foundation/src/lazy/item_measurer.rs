//! Per-lane item measurement for staggered grids.

use stagger_ui_layout::{Constraints, Orientation, Placeable};

use super::item_provider::LazyLayoutItemProvider;
use super::staggered_grid_measured_item::StaggeredGridMeasuredItem;

/// Measures items under the constraints of the lane they are placed in.
///
/// Each lane fixes the cross axis to its slot size and leaves the scrolling
/// axis unbounded. Every call to [`get_and_measure`](Self::get_and_measure)
/// invokes the measure function exactly once.
pub struct StaggeredGridItemMeasurer<'a, P: ?Sized, F> {
    item_provider: &'a P,
    slot_sums: &'a [i32],
    orientation: Orientation,
    measure: F,
    measured_count: usize,
}

impl<'a, P, F> StaggeredGridItemMeasurer<'a, P, F>
where
    P: LazyLayoutItemProvider + ?Sized,
{
    pub fn new(item_provider: &'a P, slot_sums: &'a [i32], orientation: Orientation, measure: F) -> Self {
        Self {
            item_provider,
            slot_sums,
            orientation,
            measure,
            measured_count: 0,
        }
    }

    /// Constraints for an item in `lane`.
    pub fn child_constraints(&self, lane: usize) -> Constraints {
        let previous_sum = if lane == 0 {
            0
        } else {
            self.slot_sums[lane - 1]
        };
        let cross_axis_size = self.slot_sums[lane] - previous_sum;
        Constraints::fixed_cross_axis(self.orientation, cross_axis_size)
    }

    /// Measures item `index` as a member of `lane`.
    pub fn get_and_measure<E>(&mut self, index: usize, lane: usize) -> Result<StaggeredGridMeasuredItem, E>
    where
        F: FnMut(usize, Constraints) -> Result<Vec<Placeable>, E>,
    {
        let key = self.item_provider.get_key(index);
        let constraints = self.child_constraints(lane);
        let placeables = (self.measure)(index, constraints)?;
        self.measured_count += 1;
        Ok(StaggeredGridMeasuredItem::new(
            index,
            key,
            placeables,
            self.orientation,
        ))
    }

    /// Number of successful measurements so far.
    pub fn measured_count(&self) -> usize {
        self.measured_count
    }
}
