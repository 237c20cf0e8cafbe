//! Lazy staggered grid state management.
//!
//! Provides [`LazyStaggeredGridState`] for controlling and observing the scroll
//! position of a staggered grid.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;
use std::time::Duration;

use smallvec::smallvec;
use stagger_ui_layout::{IntOffset, IntSize, Orientation};

use super::prefetch::{PrefetchScheduler, PrefetchStrategy};
use super::staggered_grid_measured_item::LazyStaggeredGridMeasureResult;
use super::staggered_grid_spans::LazyStaggeredGridSpans;
use super::{LaneIndices, LaneOffsets};

/// Per-lane first visible item and how far it is scrolled off the start.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LazyStaggeredGridScrollPosition {
    /// First visible item per lane; `None` for a lane with nothing visible.
    pub indices: LaneIndices,

    /// Scroll offset of each lane's first visible item, in pixels.
    pub offsets: LaneOffsets,
}

impl LazyStaggeredGridScrollPosition {
    /// Position with a single known lane. Other lanes are derived from it on
    /// the next pass.
    pub fn new(index: usize, offset: i32) -> Self {
        Self {
            indices: smallvec![Some(index)],
            offsets: smallvec![offset],
        }
    }

    /// Lane holding the smallest first visible index.
    fn leading_lane(&self) -> Option<usize> {
        self.indices
            .iter()
            .enumerate()
            .filter_map(|(lane, index)| index.map(|index| (index, lane)))
            .min()
            .map(|(_, lane)| lane)
    }
}

/// Counters describing the measure passes run against a state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LazyStaggeredGridStats {
    /// Completed measure passes.
    pub measure_passes: usize,

    /// Lane realignment restarts across all passes.
    pub restarts: usize,

    /// Items measured across all passes.
    pub items_measured: usize,

    /// Wall time of the last completed pass.
    pub last_pass_duration: Duration,
}

/// State object for staggered grid scroll position tracking.
///
/// Holds the per-lane scroll position, the item → lane assignments and the
/// pending scroll delta. Cloning shares the same underlying state.
///
/// # Example
///
/// ```rust,ignore
/// let state = LazyStaggeredGridState::new();
///
/// // Scroll forward by 200px on the next pass
/// state.scroll_by(200.0);
///
/// println!("First visible: {}", state.first_visible_item_index());
/// ```
#[derive(Clone)]
pub struct LazyStaggeredGridState {
    inner: Rc<RefCell<LazyStaggeredGridStateInner>>,
}

struct LazyStaggeredGridStateInner {
    scroll_position: LazyStaggeredGridScrollPosition,

    spans: LazyStaggeredGridSpans,

    /// Raw scroll delta to be consumed in the next layout pass.
    scroll_to_be_consumed: f32,

    last_consumed_scroll: f32,

    layout_info: LazyStaggeredGridLayoutInfo,

    can_scroll_forward: bool,
    can_scroll_backward: bool,

    /// Whether a pass has committed since creation.
    has_measured: bool,

    invalidate_callbacks: Vec<(u64, Rc<dyn Fn()>)>,
    next_callback_id: u64,

    stats: LazyStaggeredGridStats,

    prefetch_scheduler: PrefetchScheduler,
    prefetch_strategy: PrefetchStrategy,

    /// Direction of the last dispatched delta.
    last_scroll_forward: bool,
}

impl LazyStaggeredGridState {
    /// Creates a new [`LazyStaggeredGridState`] at the start of the content.
    pub fn new() -> Self {
        Self::with_initial_position(0, 0)
    }

    /// Creates a new [`LazyStaggeredGridState`] with lane 0 starting at
    /// `initial_first_visible_item_index`.
    pub fn with_initial_position(
        initial_first_visible_item_index: usize,
        initial_first_visible_item_scroll_offset: i32,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(LazyStaggeredGridStateInner {
                scroll_position: LazyStaggeredGridScrollPosition::new(
                    initial_first_visible_item_index,
                    initial_first_visible_item_scroll_offset,
                ),
                spans: LazyStaggeredGridSpans::new(),
                scroll_to_be_consumed: 0.0,
                last_consumed_scroll: 0.0,
                layout_info: LazyStaggeredGridLayoutInfo::default(),
                can_scroll_forward: false,
                can_scroll_backward: false,
                has_measured: false,
                invalidate_callbacks: Vec::new(),
                next_callback_id: 1,
                stats: LazyStaggeredGridStats::default(),
                prefetch_scheduler: PrefetchScheduler::new(),
                prefetch_strategy: PrefetchStrategy::default(),
                last_scroll_forward: true,
            })),
        }
    }

    /// Smallest first visible index across lanes.
    pub fn first_visible_item_index(&self) -> usize {
        let inner = self.inner.borrow();
        let position = &inner.scroll_position;
        position
            .leading_lane()
            .and_then(|lane| position.indices[lane])
            .unwrap_or(0)
    }

    /// Scroll offset of the lane holding [`first_visible_item_index`](Self::first_visible_item_index).
    pub fn first_visible_item_scroll_offset(&self) -> i32 {
        let inner = self.inner.borrow();
        let position = &inner.scroll_position;
        position
            .leading_lane()
            .map_or(0, |lane| position.offsets[lane])
    }

    /// Returns the per-lane scroll position.
    pub fn scroll_position(&self) -> LazyStaggeredGridScrollPosition {
        self.inner.borrow().scroll_position.clone()
    }

    /// Returns the layout info from the last measure pass.
    pub fn layout_info(&self) -> LazyStaggeredGridLayoutInfo {
        self.inner.borrow().layout_info.clone()
    }

    /// Returns the pass statistics.
    pub fn stats(&self) -> LazyStaggeredGridStats {
        self.inner.borrow().stats.clone()
    }

    /// Returns a snapshot of the item → lane assignments.
    pub fn spans(&self) -> LazyStaggeredGridSpans {
        self.inner.borrow().spans.clone()
    }

    /// Runs `f` with mutable access to the item → lane assignments.
    pub fn with_spans<R>(&self, f: impl FnOnce(&mut LazyStaggeredGridSpans) -> R) -> R {
        f(&mut self.inner.borrow_mut().spans)
    }

    /// Dispatches a raw scroll delta.
    ///
    /// The delta is subtracted from the lane offsets on the next pass, so a
    /// negative delta moves toward the end of the content. Returns the delta;
    /// the amount actually applied is reported by
    /// [`last_consumed_scroll`](Self::last_consumed_scroll) after the pass.
    pub fn dispatch_scroll_delta(&self, delta: f32) -> f32 {
        let mut inner = self.inner.borrow_mut();
        inner.scroll_to_be_consumed += delta;
        if delta.abs() > 0.001 {
            inner.last_scroll_forward = delta < 0.0;
        }
        drop(inner);
        self.invalidate();
        delta
    }

    /// Scrolls by `distance` pixels; positive values move toward the end.
    ///
    /// Once a pass has run, requests in a direction that cannot scroll are
    /// dropped and `0.0` is returned.
    pub fn scroll_by(&self, distance: f32) -> f32 {
        let blocked = {
            let inner = self.inner.borrow();
            inner.has_measured
                && ((distance > 0.0 && !inner.can_scroll_forward)
                    || (distance < 0.0 && !inner.can_scroll_backward))
        };
        if blocked {
            return 0.0;
        }
        -self.dispatch_scroll_delta(-distance)
    }

    /// Moves lane 0 to `index`; other lanes follow on the next pass.
    pub fn scroll_to_item(&self, index: usize, scroll_offset: i32) {
        let mut inner = self.inner.borrow_mut();
        inner.scroll_position = LazyStaggeredGridScrollPosition::new(index, scroll_offset);
        inner.scroll_to_be_consumed = 0.0;
        drop(inner);
        self.invalidate();
    }

    /// Delta waiting for the next pass.
    pub fn scroll_to_be_consumed(&self) -> f32 {
        self.inner.borrow().scroll_to_be_consumed
    }

    /// Scroll consumed by the last pass, in raw delta sign convention.
    pub fn last_consumed_scroll(&self) -> f32 {
        self.inner.borrow().last_consumed_scroll
    }

    /// Returns whether the last pass left content past the viewport end.
    pub fn can_scroll_forward(&self) -> bool {
        self.inner.borrow().can_scroll_forward
    }

    /// Returns whether the last pass left content before the viewport start.
    pub fn can_scroll_backward(&self) -> bool {
        self.inner.borrow().can_scroll_backward
    }

    /// Replaces the prefetch strategy.
    pub fn set_prefetch_strategy(&self, strategy: PrefetchStrategy) {
        self.inner.borrow_mut().prefetch_strategy = strategy;
    }

    /// Updates the prefetch queue from the last layout.
    ///
    /// Queues, per lane, the items following the last visible one (or
    /// preceding the first visible one when scrolling backward).
    pub fn update_prefetch_queue(&self) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let forward = inner.last_scroll_forward;
        let lane_count = inner.scroll_position.indices.len();

        let mut edges: LaneIndices = smallvec![None; lane_count];
        for item in &inner.layout_info.visible_items_info {
            let Some(edge) = edges.get_mut(item.lane) else {
                continue;
            };
            *edge = Some(match *edge {
                Some(current) if forward => current.max(item.index),
                Some(current) => current.min(item.index),
                None => item.index,
            });
        }

        let spans = &inner.spans;
        inner.prefetch_scheduler.update(
            &edges,
            inner.layout_info.total_items_count,
            &inner.prefetch_strategy,
            |index, lane| {
                if forward {
                    Some(spans.find_next_item_index(Some(index), lane))
                } else {
                    spans.find_previous_item_index(index, lane)
                }
            },
        );
    }

    /// Returns the indices that should be prefetched.
    /// Consumes the prefetch queue.
    pub fn take_prefetch_indices(&self) -> Vec<usize> {
        let mut inner = self.inner.borrow_mut();
        let mut indices = Vec::new();
        while let Some(index) = inner.prefetch_scheduler.next_prefetch() {
            indices.push(index);
        }
        indices
    }

    /// Adds an invalidation callback.
    pub fn add_invalidate_callback(&self, callback: Box<dyn Fn()>) -> u64 {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_callback_id;
        inner.next_callback_id += 1;
        inner.invalidate_callbacks.push((id, Rc::from(callback)));
        id
    }

    /// Removes an invalidation callback.
    pub fn remove_invalidate_callback(&self, id: u64) {
        let mut inner = self.inner.borrow_mut();
        inner.invalidate_callbacks.retain(|(cb_id, _)| *cb_id != id);
    }

    /// Runs the callbacks without holding the borrow, so they may call
    /// back into the state.
    fn invalidate(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> = self
            .inner
            .borrow()
            .invalidate_callbacks
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Moves the spans out for the duration of a pass.
    pub(crate) fn take_spans(&self) -> LazyStaggeredGridSpans {
        mem::take(&mut self.inner.borrow_mut().spans)
    }

    pub(crate) fn restore_spans(&self, spans: LazyStaggeredGridSpans) {
        self.inner.borrow_mut().spans = spans;
    }

    /// Commits a completed pass.
    pub(crate) fn apply_measure_result(
        &self,
        result: &LazyStaggeredGridMeasureResult,
        measured_count: usize,
        elapsed: Duration,
    ) {
        let mut inner = self.inner.borrow_mut();
        inner.scroll_position = LazyStaggeredGridScrollPosition {
            indices: result.first_visible_item_indices.clone(),
            offsets: result.first_visible_item_scroll_offsets.clone(),
        };
        inner.scroll_to_be_consumed = 0.0;
        inner.last_consumed_scroll = result.consumed_scroll;
        inner.can_scroll_forward = result.can_scroll_forward;
        inner.can_scroll_backward = result.can_scroll_backward;
        inner.has_measured = true;
        inner.layout_info = LazyStaggeredGridLayoutInfo {
            visible_items_info: result.visible_items_info.clone(),
            total_items_count: result.total_items_count,
            viewport_size: result.viewport_size,
            orientation: result.orientation,
            before_content_padding: result.before_content_padding,
            after_content_padding: result.after_content_padding,
        };

        inner.stats.measure_passes += 1;
        inner.stats.restarts += result.restart_count;
        inner.stats.items_measured += measured_count;
        inner.stats.last_pass_duration = elapsed;
    }
}

impl Default for LazyStaggeredGridState {
    fn default() -> Self {
        Self::new()
    }
}

/// Information about the currently visible items in a staggered grid.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct LazyStaggeredGridLayoutInfo {
    /// Information about each visible item, in index order.
    pub visible_items_info: Vec<LazyStaggeredGridItemInfo>,

    /// Total number of items in the grid.
    pub total_items_count: usize,

    /// Size of the viewport in the main axis.
    pub viewport_size: i32,

    pub orientation: Orientation,

    /// Content padding before the first item.
    pub before_content_padding: i32,

    /// Content padding after the last item.
    pub after_content_padding: i32,
}

/// Information about a single visible item in a staggered grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LazyStaggeredGridItemInfo {
    /// Index of the item in the data source.
    pub index: usize,

    /// Key of the item.
    pub key: u64,

    /// Lane the item is placed in.
    pub lane: usize,

    /// Offset of the item relative to the grid.
    pub offset: IntOffset,

    /// Size of the item.
    pub size: IntSize,
}
