//! Final positioning of measured lanes.

use std::collections::VecDeque;

use smallvec::SmallVec;
use stagger_ui_layout::{layout, Constraints, MeasureResult, Orientation, INFINITY};

use super::staggered_grid_measured_item::{LazyStaggeredGridPositionedItem, StaggeredGridMeasuredItem};
use super::{LaneIndices, LaneOffsets, LANE_INLINE_CAPACITY};

/// Measured items of each lane, front to back.
pub type LaneItems = SmallVec<[VecDeque<StaggeredGridMeasuredItem>; LANE_INLINE_CAPACITY]>;

/// Working state of every lane at the end of a measure pass.
#[derive(Clone, Debug, Default)]
pub struct StaggeredGridLanes {
    /// First visible item per lane.
    pub first_item_indices: LaneIndices,

    /// How far the first visible item of each lane is scrolled off the start.
    pub first_item_offsets: LaneOffsets,

    /// Last item measured per lane.
    pub current_item_indices: LaneIndices,

    /// End of the last measured item per lane, relative to the viewport start.
    pub current_item_offsets: LaneOffsets,

    /// Items kept for placement.
    pub items: LaneItems,
}

/// Positions and scroll capabilities produced by [`emit_placement`].
#[derive(Clone, Debug)]
pub struct StaggeredGridPlacement {
    pub positioned_items: Vec<LazyStaggeredGridPositionedItem>,
    pub measure_result: MeasureResult,
    pub can_scroll_forward: bool,
    pub can_scroll_backward: bool,
}

/// Merges the lanes in item index order and commits the layout.
///
/// Each lane starts at minus its first item offset and advances by the size
/// of every item placed in it. Lane `l` sits at cross-axis offset
/// `slot_sums[l - 1]`.
pub fn emit_placement(
    lanes: StaggeredGridLanes,
    slot_sums: &[i32],
    constraints: Constraints,
    orientation: Orientation,
    viewport_size: i32,
) -> StaggeredGridPlacement {
    let StaggeredGridLanes {
        first_item_indices,
        first_item_offsets,
        current_item_offsets,
        mut items,
        ..
    } = lanes;

    let content_extent = current_item_offsets.iter().copied().max().unwrap_or(0);
    let cross_axis_extent = match constraints.cross_axis_max(orientation) {
        INFINITY => slot_sums.last().copied().unwrap_or(0),
        bounded => bounded,
    };
    let (width, height) = match orientation {
        Orientation::Vertical => (cross_axis_extent, constraints.constrain_height(content_extent)),
        Orientation::Horizontal => (constraints.constrain_width(content_extent), cross_axis_extent),
    };

    let mut lane_offsets: LaneOffsets = first_item_offsets.iter().map(|offset| -offset).collect();
    let mut positioned_items = Vec::with_capacity(items.iter().map(VecDeque::len).sum());
    while let Some(lane) = lane_with_lowest_front_index(&items) {
        let Some(item) = items[lane].pop_front() else {
            break;
        };
        let main_axis = lane_offsets[lane];
        let cross_axis = if lane == 0 { 0 } else { slot_sums[lane - 1] };
        lane_offsets[lane] += item.main_axis_size;
        positioned_items.push(item.position(lane, main_axis, cross_axis));
    }

    let measure_result = layout(width, height, |scope| {
        for item in &positioned_items {
            item.place(scope);
        }
    });

    let can_scroll_backward = !(first_item_indices.first() == Some(&Some(0))
        && first_item_offsets.first().is_some_and(|&offset| offset <= 0));
    let can_scroll_forward = current_item_offsets
        .iter()
        .any(|&offset| offset > viewport_size);

    StaggeredGridPlacement {
        positioned_items,
        measure_result,
        can_scroll_forward,
        can_scroll_backward,
    }
}

/// Lane whose next pending item has the smallest index; lower lanes win ties.
fn lane_with_lowest_front_index(items: &LaneItems) -> Option<usize> {
    items
        .iter()
        .enumerate()
        .filter_map(|(lane, queue)| queue.front().map(|item| (item.index, lane)))
        .min()
        .map(|(_, lane)| lane)
}
