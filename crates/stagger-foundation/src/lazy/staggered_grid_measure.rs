//! Core measurement pass for lazy staggered grids.
//!
//! The pass starts from the per-lane first visible items stored in
//! [`LazyStaggeredGridState`], applies the pending scroll delta, and fills the
//! viewport lane by lane, always extending the lane that ends first. Items
//! keep the lane recorded in [`LazyStaggeredGridSpans`](super::LazyStaggeredGridSpans)
//! so scrolling back retraces the same layout.
//!
//! Lanes can become inconsistent when items change size or the data set
//! shrinks. The pass detects two such cases and restarts once from a
//! realigned position:
//!
//! - scrolling back reaches the start of the content with lanes that do not
//!   line up (uneven offsets, earlier items left in other lanes, or item 0
//!   outside lane 0)
//! - one lane runs out of items while other lanes still have unplaced items
//!   recorded for them ("missed" items)

use std::collections::VecDeque;

use smallvec::smallvec;
use stagger_ui_layout::{layout, Constraints, Orientation, Placeable, INFINITY};
use web_time::Instant;

use super::item_measurer::StaggeredGridItemMeasurer;
use super::item_provider::LazyLayoutItemProvider;
use super::staggered_grid_measured_item::{LazyStaggeredGridMeasureResult, StaggeredGridMeasuredItem};
use super::staggered_grid_placement::{emit_placement, StaggeredGridLanes};
use super::staggered_grid_spans::LazyStaggeredGridSpans;
use super::staggered_grid_state::{LazyStaggeredGridScrollPosition, LazyStaggeredGridState};
use super::{LaneIndices, LaneOffsets};

/// Realignment restarts allowed per pass.
pub const MAX_MEASURE_RESTARTS: usize = 1;

/// Viewport used when the scrolling axis is unbounded.
pub const MAX_REASONABLE_VIEWPORT: i32 = 100_000;

/// Largest scroll delta applied by a single pass, in either direction.
///
/// Leaves headroom for lane offsets to absorb item sizes without overflow.
pub const MAX_SCROLL_DELTA: i32 = i32::MAX / 4;

/// Layout parameters of a measure pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LazyStaggeredGridMeasureConfig {
    pub orientation: Orientation,

    /// Padding before the first item along the scrolling axis.
    pub before_content_padding: i32,

    /// Padding after the last item along the scrolling axis.
    pub after_content_padding: i32,
}

/// Measures and positions the visible items of a staggered grid.
///
/// `slot_sums` holds the cumulative cross-axis boundaries of the lanes.
/// `measure` is called once per item the pass needs; its error aborts the
/// pass and leaves the state's position and pending delta untouched.
///
/// On success the state receives the new scroll position, layout info and
/// consumed scroll, and its pending delta is cleared.
pub fn measure_staggered_grid<P, F, E>(
    state: &LazyStaggeredGridState,
    item_provider: &P,
    slot_sums: &[i32],
    constraints: Constraints,
    config: &LazyStaggeredGridMeasureConfig,
    measure: F,
) -> Result<LazyStaggeredGridMeasureResult, E>
where
    P: LazyLayoutItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> Result<Vec<Placeable>, E>,
{
    let started = Instant::now();
    let position = state.scroll_position();
    let requested_scroll = state.scroll_to_be_consumed();

    let mut spans = state.take_spans();
    let outcome = measure_with_spans(
        &mut spans,
        &position,
        requested_scroll,
        item_provider,
        slot_sums,
        constraints,
        *config,
        measure,
    );
    state.restore_spans(spans);

    let (result, measured_count) = outcome?;
    let elapsed = started.elapsed();
    log::trace!(
        "staggered grid pass: {} visible, {} measured, consumed {} of {}, {:?}",
        result.positioned_items.len(),
        measured_count,
        result.consumed_scroll,
        requested_scroll,
        elapsed
    );
    state.apply_measure_result(&result, measured_count, elapsed);
    Ok(result)
}

#[allow(clippy::too_many_arguments)]
fn measure_with_spans<P, F, E>(
    spans: &mut LazyStaggeredGridSpans,
    position: &LazyStaggeredGridScrollPosition,
    requested_scroll: f32,
    item_provider: &P,
    slot_sums: &[i32],
    constraints: Constraints,
    config: LazyStaggeredGridMeasureConfig,
    measure: F,
) -> Result<(LazyStaggeredGridMeasureResult, usize), E>
where
    P: LazyLayoutItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> Result<Vec<Placeable>, E>,
{
    let item_count = item_provider.item_count();
    let main_axis_available_size = match constraints.main_axis_max(config.orientation) {
        INFINITY => {
            log::warn!(
                "staggered grid measured with an unbounded scrolling axis; limiting viewport to {}",
                MAX_REASONABLE_VIEWPORT
            );
            MAX_REASONABLE_VIEWPORT
        }
        bounded => bounded,
    };

    let mut context = MeasureContext {
        spans,
        measurer: StaggeredGridItemMeasurer::new(item_provider, slot_sums, config.orientation, measure),
        slot_sums,
        constraints,
        config,
        item_count,
        main_axis_available_size,
        requested_scroll,
        requested_delta: clamp_scroll_delta(requested_scroll),
    };

    if item_count == 0 || slot_sums.is_empty() {
        return Ok((context.empty_result(), 0));
    }

    let (indices, offsets) = initial_position(context.spans, position, slot_sums.len());
    let mut request = MeasureRequest {
        scroll_delta: context.requested_delta,
        indices,
        offsets,
    };

    let mut restart_count = 0;
    loop {
        let can_restart = restart_count < MAX_MEASURE_RESTARTS;
        match context.measure(&request, can_restart)? {
            PassOutcome::Done(mut result) => {
                result.restart_count = restart_count;
                return Ok((*result, context.measurer.measured_count()));
            }
            PassOutcome::Restart(next) => {
                restart_count += 1;
                log::debug!(
                    "staggered grid lanes misaligned, restarting from {:?} with delta {}",
                    next.indices,
                    next.scroll_delta
                );
                request = next;
            }
        }
    }
}

/// Starting lanes for a pass.
///
/// When the lane count changed since the stored position was taken, the span
/// assignments are dropped and missing lanes continue from the lane before
/// them.
fn initial_position(
    spans: &mut LazyStaggeredGridSpans,
    position: &LazyStaggeredGridScrollPosition,
    lane_count: usize,
) -> (LaneIndices, LaneOffsets) {
    let indices = if position.indices.len() == lane_count {
        position.indices.clone()
    } else {
        log::debug!(
            "staggered grid lane count changed from {} to {}, resetting spans",
            position.indices.len(),
            lane_count
        );
        spans.reset();
        spans.set_span(0, Some(0));
        let mut indices = LaneIndices::with_capacity(lane_count);
        for lane in 0..lane_count {
            let index = match position.indices.get(lane) {
                Some(&stored) => stored,
                None if lane == 0 => Some(0),
                None => Some(spans.find_next_item_index(indices[lane - 1], lane)),
            };
            if let Some(index) = index {
                spans.set_span(index, Some(lane));
            }
            indices.push(index);
        }
        indices
    };

    let offsets = if position.offsets.len() == lane_count {
        position.offsets.clone()
    } else {
        let mut offsets = LaneOffsets::with_capacity(lane_count);
        for lane in 0..lane_count {
            let offset = match position.offsets.get(lane) {
                Some(&stored) => stored,
                None if lane == 0 => 0,
                None => offsets[lane - 1],
            };
            offsets.push(offset);
        }
        offsets
    };

    (indices, offsets)
}

/// Where a single attempt starts from.
#[derive(Clone, Debug)]
struct MeasureRequest {
    scroll_delta: i32,
    indices: LaneIndices,
    offsets: LaneOffsets,
}

enum PassOutcome {
    Done(Box<LazyStaggeredGridMeasureResult>),
    Restart(MeasureRequest),
}

struct MeasureContext<'a, P: ?Sized, F> {
    spans: &'a mut LazyStaggeredGridSpans,
    measurer: StaggeredGridItemMeasurer<'a, P, F>,
    slot_sums: &'a [i32],
    constraints: Constraints,
    config: LazyStaggeredGridMeasureConfig,
    item_count: usize,
    main_axis_available_size: i32,
    requested_scroll: f32,
    /// `requested_scroll` rounded and clamped to [`MAX_SCROLL_DELTA`].
    requested_delta: i32,
}

impl<'a, P, F, E> MeasureContext<'a, P, F>
where
    P: LazyLayoutItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> Result<Vec<Placeable>, E>,
{
    fn measure(&mut self, request: &MeasureRequest, can_restart: bool) -> Result<PassOutcome, E> {
        let lane_count = self.slot_sums.len();
        let before_padding = self.config.before_content_padding;
        let min_offset = -before_padding;
        let max_offset = self.main_axis_available_size;

        // Scroll actually applied by this attempt.
        let mut scroll_delta = request.scroll_delta;

        let mut first_item_indices = request.indices.clone();
        let mut first_item_offsets = request.offsets.clone();
        self.ensure_indices_in_range(&mut first_item_indices);

        offset_by(&mut first_item_offsets, -scroll_delta);

        // Cannot scroll before the first item.
        if first_item_indices[0] == Some(0) && first_item_offsets[0] < 0 {
            scroll_delta += first_item_offsets[0];
            first_item_offsets.iter_mut().for_each(|offset| *offset = 0);
        }

        let mut items: super::LaneItems = (0..lane_count).map(|_| VecDeque::new()).collect();

        // Fill the before padding too; undone once the start is resolved.
        offset_by(&mut first_item_offsets, -before_padding);

        while has_space_behind(&first_item_indices, &first_item_offsets) {
            let lane = index_of_min_value(&first_item_offsets);
            let previous = first_item_indices[lane]
                .and_then(|index| self.spans.find_previous_item_index(index, lane));
            let Some(previous) = previous else {
                break;
            };

            if self.spans.get_span(previous).is_none() {
                self.spans.set_span(previous, Some(lane));
            }

            let item = self.measurer.get_and_measure(previous, lane)?;
            first_item_offsets[lane] += item.main_axis_size;
            first_item_indices[lane] = Some(previous);
            items[lane].push_front(item);
        }

        if first_item_offsets.iter().any(|&offset| offset < min_offset) {
            let lane = index_of_min_value(&first_item_offsets);
            if can_restart && self.misaligned_start(lane, &first_item_indices, &first_item_offsets) {
                self.spans.reset();
                return Ok(PassOutcome::Restart(MeasureRequest {
                    scroll_delta,
                    indices: smallvec![None; lane_count],
                    offsets: smallvec![request.offsets[lane]; lane_count],
                }));
            }
        }

        // Not enough items before the first visible ones: give the rest back.
        if first_item_offsets[0] < min_offset {
            let shortfall = first_item_offsets[0] - min_offset;
            scroll_delta += shortfall;
            offset_by(&mut first_item_offsets, -shortfall);
        }

        let mut current_item_indices = request.indices.clone();
        self.ensure_indices_in_range(&mut current_item_indices);
        let current_item_offsets = request
            .offsets
            .iter()
            .map(|&offset| scroll_delta.saturating_sub(offset))
            .collect();

        offset_by(&mut first_item_offsets, before_padding);

        let mut lanes = StaggeredGridLanes {
            first_item_indices,
            first_item_offsets,
            current_item_indices,
            current_item_offsets,
            items,
        };

        let max_main_axis = (max_offset + self.config.after_content_padding).max(0);

        for lane in 0..lane_count {
            let Some(index) = lanes.current_item_indices[lane] else {
                continue;
            };
            let item = self.measurer.get_and_measure(index, lane)?;
            lanes.current_item_offsets[lane] += item.main_axis_size;
            self.spans.set_span(index, Some(lane));
            self.keep_visible(&mut lanes, lane, item, min_offset);
        }

        // Keep at least one item even if everything sits in the padding.
        while lanes
            .current_item_offsets
            .iter()
            .any(|&offset| offset <= max_main_axis)
            || lanes.items.iter().all(VecDeque::is_empty)
        {
            let lane = index_of_min_value(&lanes.current_item_offsets);
            let next = self
                .spans
                .find_next_item_index(lanes.current_item_indices[lane], lane);

            if next >= self.item_count {
                match self.clear_missed_items(lane, &lanes.current_item_indices) {
                    Some(missed) if can_restart => {
                        let mut indices = request.indices.clone();
                        indices[lane] = indices[lane].min(Some(missed));
                        return Ok(PassOutcome::Restart(MeasureRequest {
                            scroll_delta: request.scroll_delta,
                            indices,
                            offsets: request.offsets.clone(),
                        }));
                    }
                    _ => break,
                }
            }

            if lanes.first_item_indices[lane].is_none() {
                lanes.first_item_indices[lane] = Some(next);
            }
            self.spans.set_span(next, Some(lane));

            let item = self.measurer.get_and_measure(next, lane)?;
            lanes.current_item_offsets[lane] += item.main_axis_size;
            self.keep_visible(&mut lanes, lane, item, min_offset);
            lanes.current_item_indices[lane] = Some(next);
        }

        // The viewport is not filled: scroll back over earlier items.
        if lanes
            .current_item_offsets
            .iter()
            .all(|&offset| offset < max_offset)
        {
            let max_lane = index_of_max_value(&lanes.current_item_offsets);
            let to_scroll_back = max_offset - lanes.current_item_offsets[max_lane];
            offset_by(&mut lanes.first_item_offsets, -to_scroll_back);
            offset_by(&mut lanes.current_item_offsets, to_scroll_back);

            while lanes
                .first_item_offsets
                .iter()
                .any(|&offset| offset < before_padding)
            {
                let lane = index_of_min_value(&lanes.first_item_offsets);
                let current = lanes.first_item_indices[lane].unwrap_or(self.item_count);
                let Some(previous) = self.spans.find_previous_item_index(current, lane) else {
                    if can_restart
                        && self.misaligned_start(lane, &lanes.first_item_indices, &lanes.first_item_offsets)
                    {
                        self.spans.reset();
                        return Ok(PassOutcome::Restart(MeasureRequest {
                            scroll_delta,
                            indices: smallvec![None; lane_count],
                            offsets: smallvec![0; lane_count],
                        }));
                    }
                    break;
                };

                self.spans.set_span(previous, Some(lane));

                let item = self.measurer.get_and_measure(previous, lane)?;
                lanes.first_item_offsets[lane] += item.main_axis_size;
                lanes.first_item_indices[lane] = Some(previous);
                lanes.items[lane].push_front(item);
            }
            scroll_delta += to_scroll_back;

            let min_lane = index_of_min_value(&lanes.first_item_offsets);
            let leftover = lanes.first_item_offsets[min_lane];
            if leftover < 0 {
                scroll_delta += leftover;
                offset_by(&mut lanes.current_item_offsets, leftover);
                offset_by(&mut lanes.first_item_offsets, -leftover);
            }
        }

        let requested = self.requested_delta;
        let consumed_scroll =
            if requested.signum() == scroll_delta.signum() && requested.abs() >= scroll_delta.abs() {
                scroll_delta as f32
            } else {
                self.requested_scroll
            };

        let first_visible_item_indices = lanes.first_item_indices.clone();
        let first_visible_item_scroll_offsets = lanes.first_item_offsets.clone();
        let placement = emit_placement(
            lanes,
            self.slot_sums,
            self.constraints,
            self.config.orientation,
            max_offset,
        );

        Ok(PassOutcome::Done(Box::new(LazyStaggeredGridMeasureResult {
            first_visible_item_indices,
            first_visible_item_scroll_offsets,
            consumed_scroll,
            measure_result: placement.measure_result,
            can_scroll_forward: placement.can_scroll_forward,
            can_scroll_backward: placement.can_scroll_backward,
            visible_items_info: placement
                .positioned_items
                .iter()
                .map(|item| item.to_item_info())
                .collect(),
            positioned_items: placement.positioned_items,
            total_items_count: self.item_count,
            viewport_size: max_offset,
            orientation: self.config.orientation,
            before_content_padding: self.config.before_content_padding,
            after_content_padding: self.config.after_content_padding,
            restart_count: 0,
        })))
    }

    /// Queues `item` for placement, or skips it when it ends before the
    /// visible area. The last item is always kept.
    fn keep_visible(
        &self,
        lanes: &mut StaggeredGridLanes,
        lane: usize,
        item: StaggeredGridMeasuredItem,
        min_offset: i32,
    ) {
        if lanes.current_item_offsets[lane] <= min_offset && item.index + 1 != self.item_count {
            lanes.first_item_indices[lane] = None;
            lanes.first_item_offsets[lane] -= item.main_axis_size;
        } else {
            lanes.items[lane].push_back(item);
        }
    }

    /// Clears the spans of items recorded for lanes other than `lane` that
    /// those lanes never reached. Returns the smallest such index.
    ///
    /// A lane without a current item is scanned from `lane`'s current item,
    /// since everything before it already lies behind the viewport. Item 0
    /// stays in lane 0.
    fn clear_missed_items(&mut self, lane: usize, current_item_indices: &[Option<usize>]) -> Option<usize> {
        let mut missed: Option<usize> = None;
        for (other, &current) in current_item_indices.iter().enumerate() {
            if other == lane {
                continue;
            }
            let start = current.or(current_item_indices[lane]);
            let mut index = self.spans.find_next_item_index(start, other);
            if index == 0 && lane != 0 {
                index = self.spans.find_next_item_index(Some(0), other);
            }
            while index < self.item_count {
                missed = Some(missed.map_or(index, |missed| missed.min(index)));
                self.spans.set_span(index, None);
                index = self.spans.find_next_item_index(Some(index), other);
            }
        }
        missed
    }

    /// Whether lanes reaching the start around `lane` are out of line.
    fn misaligned_start(&self, lane: usize, first_item_indices: &[Option<usize>], first_item_offsets: &[i32]) -> bool {
        let reference = first_item_offsets[lane];
        let misaligned_offsets = first_item_offsets.iter().any(|&offset| offset != reference);
        let more_items_in_other_lanes = first_item_indices.iter().enumerate().any(|(lane, &index)| {
            index
                .and_then(|index| self.spans.find_previous_item_index(index, lane))
                .is_some()
        });
        let first_item_in_wrong_lane = self.spans.get_span(0) != Some(0);
        misaligned_offsets || more_items_in_other_lanes || first_item_in_wrong_lane
    }

    /// Walks indices past the end of the data back into range and reserves
    /// their spans.
    fn ensure_indices_in_range(&mut self, indices: &mut [Option<usize>]) {
        for (lane, slot) in indices.iter_mut().enumerate() {
            while let Some(index) = *slot {
                if index < self.item_count {
                    break;
                }
                *slot = self.spans.find_previous_item_index(index, lane);
            }
            if let Some(index) = *slot {
                self.spans.set_span(index, Some(lane));
            }
        }
    }

    fn empty_result(&self) -> LazyStaggeredGridMeasureResult {
        LazyStaggeredGridMeasureResult {
            measure_result: layout(self.constraints.min_width, self.constraints.min_height, |_| {}),
            viewport_size: self.main_axis_available_size,
            orientation: self.config.orientation,
            before_content_padding: self.config.before_content_padding,
            after_content_padding: self.config.after_content_padding,
            ..Default::default()
        }
    }
}

fn has_space_behind(first_item_indices: &[Option<usize>], first_item_offsets: &[i32]) -> bool {
    first_item_indices
        .iter()
        .zip(first_item_offsets)
        .any(|(&index, &offset)| offset < 0 && index.is_some_and(|index| index > 0))
}

fn offset_by(offsets: &mut [i32], delta: i32) {
    for offset in offsets {
        *offset = offset.saturating_add(delta);
    }
}

/// Rounds a pending delta to whole pixels within [`MAX_SCROLL_DELTA`].
fn clamp_scroll_delta(delta: f32) -> i32 {
    let limit = MAX_SCROLL_DELTA as f32;
    // NaN casts to 0.
    delta.round().clamp(-limit, limit) as i32
}

/// Lane with the smallest value; the lowest lane wins ties.
fn index_of_min_value(values: &[i32]) -> usize {
    let mut result = 0;
    for (lane, &value) in values.iter().enumerate() {
        if value < values[result] {
            result = lane;
        }
    }
    result
}

/// Lane with the largest value; the lowest lane wins ties.
fn index_of_max_value(values: &[i32]) -> usize {
    let mut result = 0;
    for (lane, &value) in values.iter().enumerate() {
        if value > values[result] {
            result = lane;
        }
    }
    result
}
