//! Host entry point for measuring a staggered grid from interval content.

use stagger_ui_layout::{Constraints, Orientation, INFINITY};

use super::error::StaggeredGridError;
use super::prefetch::PrefetchStrategy;
use super::staggered_grid_cells::StaggeredGridCells;
use super::staggered_grid_measure::{measure_staggered_grid, LazyStaggeredGridMeasureConfig};
use super::staggered_grid_measured_item::LazyStaggeredGridMeasureResult;
use super::staggered_grid_scope::LazyStaggeredGridIntervalContent;
use super::staggered_grid_state::LazyStaggeredGridState;

/// Layout parameters of a staggered grid: lanes, direction, padding and prefetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LazyStaggeredGridSpec {
    /// How the cross axis is split into lanes.
    pub cells: StaggeredGridCells,
    /// Scrolling direction.
    pub orientation: Orientation,
    /// Content padding before the first item.
    pub content_padding_before: i32,
    /// Content padding after the last item.
    pub content_padding_after: i32,
    /// Number of items per lane to prefetch beyond the visible bounds.
    pub beyond_bounds_item_count: usize,
}

impl Default for LazyStaggeredGridSpec {
    fn default() -> Self {
        Self {
            cells: StaggeredGridCells::default(),
            orientation: Orientation::Vertical,
            content_padding_before: 0,
            content_padding_after: 0,
            beyond_bounds_item_count: 2,
        }
    }
}

impl LazyStaggeredGridSpec {
    pub fn new(cells: StaggeredGridCells) -> Self {
        Self {
            cells,
            ..Self::default()
        }
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn content_padding(mut self, before: i32, after: i32) -> Self {
        self.content_padding_before = before;
        self.content_padding_after = after;
        self
    }

    /// Sets uniform content padding on both ends of the scrolling axis.
    pub fn content_padding_all(mut self, padding: i32) -> Self {
        self.content_padding_before = padding;
        self.content_padding_after = padding;
        self
    }

    pub fn beyond_bounds_item_count(mut self, count: usize) -> Self {
        self.beyond_bounds_item_count = count;
        self
    }

    pub fn measure_config(&self) -> LazyStaggeredGridMeasureConfig {
        LazyStaggeredGridMeasureConfig {
            orientation: self.orientation,
            before_content_padding: self.content_padding_before,
            after_content_padding: self.content_padding_after,
        }
    }
}

/// Measures `content` as a staggered grid within `constraints`.
///
/// Lanes are resolved from the cross-axis max constraint, which must be
/// bounded, as must the scrolling axis. On success the prefetch queue of
/// `state` is refreshed for the new layout.
pub fn measure_lazy_staggered_grid(
    content: &LazyStaggeredGridIntervalContent,
    state: &LazyStaggeredGridState,
    spec: &LazyStaggeredGridSpec,
    constraints: Constraints,
) -> Result<LazyStaggeredGridMeasureResult, StaggeredGridError> {
    if constraints.main_axis_max(spec.orientation) == INFINITY {
        return Err(StaggeredGridError::UnboundedMainAxis);
    }
    let cross_axis_size = constraints.cross_axis_max(spec.orientation);
    if cross_axis_size == INFINITY {
        return Err(StaggeredGridError::UnboundedCrossAxis);
    }
    let slot_sums = spec.cells.resolve_slot_sums(cross_axis_size)?;

    let result = measure_staggered_grid(
        state,
        content,
        &slot_sums,
        constraints,
        &spec.measure_config(),
        |index, child_constraints| content.measure_item(index, child_constraints),
    )?;

    state.set_prefetch_strategy(match spec.beyond_bounds_item_count {
        0 => PrefetchStrategy::disabled(),
        count => PrefetchStrategy::new(count),
    });
    state.update_prefetch_queue();
    Ok(result)
}
