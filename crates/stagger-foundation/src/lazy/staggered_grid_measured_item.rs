//! Measured and positioned item representation for staggered grids.
//!
//! Contains the result of measuring a single item and the layout result of a
//! whole pass.

use stagger_ui_layout::{IntOffset, IntSize, MeasureResult, Orientation, Placeable, PlacementScope};

use super::staggered_grid_state::LazyStaggeredGridItemInfo;
use super::{LaneIndices, LaneOffsets};

/// An item measured in a specific lane, not yet positioned.
#[derive(Clone, Debug)]
pub struct StaggeredGridMeasuredItem {
    /// Index in the data source.
    pub index: usize,

    /// Stable key for the item.
    pub key: u64,

    /// Measured children of the item.
    pub placeables: Vec<Placeable>,

    /// Sum of the placeables' extents along the scrolling axis.
    pub main_axis_size: i32,

    /// Largest placeable extent across the scrolling axis.
    pub cross_axis_size: i32,

    orientation: Orientation,
}

impl StaggeredGridMeasuredItem {
    pub fn new(index: usize, key: u64, placeables: Vec<Placeable>, orientation: Orientation) -> Self {
        let main_axis_size = placeables
            .iter()
            .map(|placeable| orientation.main_axis(placeable.size()))
            .sum();
        let cross_axis_size = placeables
            .iter()
            .map(|placeable| orientation.cross_axis(placeable.size()))
            .max()
            .unwrap_or(0);
        Self {
            index,
            key,
            placeables,
            main_axis_size,
            cross_axis_size,
            orientation,
        }
    }

    /// Fixes the item at `main_axis`/`cross_axis` within `lane`.
    pub fn position(self, lane: usize, main_axis: i32, cross_axis: i32) -> LazyStaggeredGridPositionedItem {
        LazyStaggeredGridPositionedItem {
            index: self.index,
            key: self.key,
            lane,
            offset: self.orientation.offset(main_axis, cross_axis),
            size: self.orientation.size(self.main_axis_size, self.cross_axis_size),
            main_axis_size: self.main_axis_size,
            placeables: self.placeables,
        }
    }
}

/// An item with its final offset relative to the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LazyStaggeredGridPositionedItem {
    pub index: usize,
    pub key: u64,
    pub lane: usize,
    pub offset: IntOffset,
    pub size: IntSize,
    pub main_axis_size: i32,
    pub placeables: Vec<Placeable>,
}

impl LazyStaggeredGridPositionedItem {
    /// Places every placeable of the item at the item offset.
    pub fn place(&self, scope: &mut dyn PlacementScope) {
        for placeable in &self.placeables {
            scope.place(placeable, self.offset);
        }
    }

    /// Converts to layout info for external consumption.
    pub fn to_item_info(&self) -> LazyStaggeredGridItemInfo {
        LazyStaggeredGridItemInfo {
            index: self.index,
            key: self.key,
            lane: self.lane,
            offset: self.offset,
            size: self.size,
        }
    }
}

/// Result of a staggered grid measure pass.
#[derive(Clone, Debug, Default)]
pub struct LazyStaggeredGridMeasureResult {
    /// First visible item per lane; `None` for a lane with nothing visible.
    pub first_visible_item_indices: LaneIndices,

    /// How far the first visible item of each lane is scrolled off the start.
    pub first_visible_item_scroll_offsets: LaneOffsets,

    /// Scroll delta applied by this pass, in the same sign convention as the
    /// dispatched delta.
    pub consumed_scroll: f32,

    /// Committed layout size and placements.
    pub measure_result: MeasureResult,

    pub can_scroll_forward: bool,

    pub can_scroll_backward: bool,

    /// Visible items in index order.
    pub visible_items_info: Vec<LazyStaggeredGridItemInfo>,

    /// Visible items with their placeables, in index order.
    pub positioned_items: Vec<LazyStaggeredGridPositionedItem>,

    pub total_items_count: usize,

    /// Extent of the viewport along the scrolling axis.
    pub viewport_size: i32,

    pub orientation: Orientation,

    pub before_content_padding: i32,

    pub after_content_padding: i32,

    /// Lane realignment restarts performed during the pass.
    pub restart_count: usize,
}

impl LazyStaggeredGridMeasureResult {
    /// Visible item indices assigned to `lane`, in index order.
    pub fn lane_indices(&self, lane: usize) -> Vec<usize> {
        self.positioned_items
            .iter()
            .filter(|item| item.lane == lane)
            .map(|item| item.index)
            .collect()
    }
}
