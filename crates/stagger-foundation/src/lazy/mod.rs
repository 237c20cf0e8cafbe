//! Lazy staggered grid layout.
//!
//! A staggered grid splits the cross axis into lanes and stacks items of
//! arbitrary main-axis size into them. Only the items intersecting the
//! viewport are measured on each pass.
//!
//! # Architecture
//!
//! - [`LazyStaggeredGridSpans`] - item → lane assignment, kept across passes
//! - [`StaggeredGridItemMeasurer`] - measures one item under its lane's constraints
//! - [`measure_staggered_grid`] - the viewport fill pass (scroll consumption,
//!   backward/forward fill, lane realignment with a single bounded restart)
//! - [`emit_placement`] - merges lanes in index order and assigns final offsets
//! - [`LazyStaggeredGridState`] - scroll position, pending delta, layout info
//! - [`LazyStaggeredGridScope`] - DSL for declaring items
//! - [`measure_lazy_staggered_grid`] - host entry point resolving lanes from
//!   [`StaggeredGridCells`]
//!
//! # Example
//!
//! ```rust,ignore
//! let state = LazyStaggeredGridState::new();
//! let mut content = LazyStaggeredGridIntervalContent::new();
//! content.items(100, None::<fn(usize) -> u64>, |index, constraints| {
//!     Ok(vec![Placeable::new(constraints.max_width, 40 + (index as i32 % 5) * 20)])
//! });
//!
//! let spec = LazyStaggeredGridSpec::new(StaggeredGridCells::Fixed(3));
//! let result = measure_lazy_staggered_grid(&content, &state, &spec, Constraints::loose(300, 600))?;
//! ```

mod error;
mod item_measurer;
mod item_provider;
mod prefetch;
mod staggered_grid_cells;
mod staggered_grid_layout;
mod staggered_grid_measure;
mod staggered_grid_measured_item;
mod staggered_grid_placement;
mod staggered_grid_scope;
mod staggered_grid_spans;
mod staggered_grid_state;

pub use error::*;
pub use item_measurer::*;
pub use item_provider::*;
pub use prefetch::*;
pub use staggered_grid_cells::*;
pub use staggered_grid_layout::*;
pub use staggered_grid_measure::*;
pub use staggered_grid_measured_item::*;
pub use staggered_grid_placement::*;
pub use staggered_grid_scope::*;
pub use staggered_grid_spans::*;
pub use staggered_grid_state::*;

use smallvec::SmallVec;

/// Lanes kept inline before spilling to the heap.
pub const LANE_INLINE_CAPACITY: usize = 8;

/// Per-lane item index. `None` marks a lane with no item yet.
pub type LaneIndices = SmallVec<[Option<usize>; LANE_INLINE_CAPACITY]>;

/// Per-lane main-axis offset in pixels.
pub type LaneOffsets = SmallVec<[i32; LANE_INLINE_CAPACITY]>;

/// Cumulative cross-axis boundaries: lane `i` spans `[sums[i - 1], sums[i])`.
pub type SlotSums = SmallVec<[i32; LANE_INLINE_CAPACITY]>;
