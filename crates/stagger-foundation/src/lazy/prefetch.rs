//! Prefetch scheduler for lazy staggered grids.
//!
//! Queues the items each lane will show next so hosts can prepare them
//! before they scroll into view.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::LANE_INLINE_CAPACITY;

/// Strategy for prefetching items in a lazy layout.
#[derive(Clone, Debug)]
pub struct PrefetchStrategy {
    /// Number of items to prefetch beyond the visible area, per lane.
    pub prefetch_count: usize,

    /// Whether prefetching is enabled.
    pub enabled: bool,
}

impl Default for PrefetchStrategy {
    fn default() -> Self {
        Self {
            prefetch_count: 2,
            enabled: true,
        }
    }
}

impl PrefetchStrategy {
    /// Creates a new prefetch strategy with the specified count.
    pub fn new(prefetch_count: usize) -> Self {
        Self {
            prefetch_count,
            enabled: true,
        }
    }

    /// Disables prefetching.
    pub fn disabled() -> Self {
        Self {
            prefetch_count: 0,
            enabled: false,
        }
    }
}

/// Scheduler that tracks which items should be prefetched.
#[derive(Debug, Default)]
pub struct PrefetchScheduler {
    /// Indices to prefetch, nearest to the viewport first.
    prefetch_queue: VecDeque<usize>,

    /// Everything queued by the last update.
    queued: FxHashSet<usize>,
}

impl PrefetchScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the queue from the visible edge of every lane.
    ///
    /// `lane_edges` holds, per lane, the visible item to continue from (the
    /// last one when scrolling forward, the first one when scrolling
    /// backward). `step(index, lane)` returns the next item of `lane` in the
    /// scroll direction. Lanes advance in rounds so that items at the same
    /// distance from the viewport are queued together.
    pub fn update<N>(
        &mut self,
        lane_edges: &[Option<usize>],
        total_items: usize,
        strategy: &PrefetchStrategy,
        mut step: N,
    ) where
        N: FnMut(usize, usize) -> Option<usize>,
    {
        self.prefetch_queue.clear();
        self.queued.clear();
        if !strategy.enabled {
            return;
        }

        let mut cursors: SmallVec<[Option<usize>; LANE_INLINE_CAPACITY]> =
            lane_edges.iter().copied().collect();
        for _ in 0..strategy.prefetch_count {
            for (lane, cursor) in cursors.iter_mut().enumerate() {
                let Some(current) = *cursor else {
                    continue;
                };
                let next = step(current, lane).filter(|&next| next < total_items);
                *cursor = next;
                if let Some(next) = next {
                    if self.queued.insert(next) {
                        self.prefetch_queue.push_back(next);
                    }
                }
            }
        }
    }

    /// Returns the next item index to prefetch, if any.
    pub fn next_prefetch(&mut self) -> Option<usize> {
        self.prefetch_queue.pop_front()
    }

    /// Returns all pending prefetch indices.
    pub fn pending_prefetches(&self) -> &VecDeque<usize> {
        &self.prefetch_queue
    }
}
