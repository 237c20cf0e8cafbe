//! DSL scope for building lazy staggered grid content.
//!
//! Provides the [`LazyStaggeredGridScope`] trait and the interval content it
//! builds. Each item is described by a measure function that receives the
//! lane constraints and returns the item's placeables.

use std::ops::Range;
use std::rc::Rc;

use stagger_ui_layout::{Constraints, Placeable};

use super::error::ItemMeasureError;
use super::item_provider::LazyLayoutItemProvider;

/// Measures one item of an interval, given its local index.
pub type StaggeredItemContent = Rc<dyn Fn(usize, Constraints) -> Result<Vec<Placeable>, ItemMeasureError>>;

/// Receiver scope for staggered grid content definition.
///
/// # Example
///
/// ```rust,ignore
/// let mut content = LazyStaggeredGridIntervalContent::new();
///
/// // Single item
/// content.item(Some(0), |constraints| {
///     Ok(vec![Placeable::new(constraints.max_width, 48)])
/// });
///
/// // Multiple items
/// content.items(photos.len(), Some(move |i| photos[i].id), move |i, constraints| {
///     Ok(vec![Placeable::new(constraints.max_width, photos[i].height)])
/// });
/// ```
pub trait LazyStaggeredGridScope {
    /// Adds a single item to the grid.
    ///
    /// # Arguments
    /// * `key` - Optional stable key for the item
    /// * `content` - Measures the item under its lane constraints
    fn item<F>(&mut self, key: Option<u64>, content: F)
    where
        F: Fn(Constraints) -> Result<Vec<Placeable>, ItemMeasureError> + 'static;

    /// Adds multiple items to the grid.
    ///
    /// # Arguments
    /// * `count` - Number of items to add
    /// * `key` - Optional function to generate stable keys from the local index
    /// * `item_content` - Measures the item at a local index
    fn items<K, F>(&mut self, count: usize, key: Option<K>, item_content: F)
    where
        K: Fn(usize) -> u64 + 'static,
        F: Fn(usize, Constraints) -> Result<Vec<Placeable>, ItemMeasureError> + 'static;
}

/// A run of consecutive items declared by one `item`/`items` call.
pub struct LazyStaggeredGridInterval {
    /// Start index of this interval in the total item list.
    pub start_index: usize,

    /// Number of items in this interval.
    pub count: usize,

    /// Key generator for items in this interval.
    pub key: Option<Rc<dyn Fn(usize) -> u64>>,

    /// Measure function, called with the local index within the interval.
    pub content: StaggeredItemContent,
}

impl std::fmt::Debug for LazyStaggeredGridInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyStaggeredGridInterval")
            .field("start_index", &self.start_index)
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

/// Builder that collects intervals during scope execution.
#[derive(Default)]
pub struct LazyStaggeredGridIntervalContent {
    intervals: Vec<LazyStaggeredGridInterval>,
    total_count: usize,
}

impl LazyStaggeredGridIntervalContent {
    /// Creates a new empty interval content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of items across all intervals.
    pub fn item_count(&self) -> usize {
        self.total_count
    }

    /// Gets the key for an item at the given global index.
    ///
    /// Items without a key function use their index.
    pub fn get_key(&self, index: usize) -> u64 {
        if let Some((interval, local_index)) = self.find_interval(index) {
            if let Some(key_fn) = &interval.key {
                return key_fn(local_index);
            }
        }
        index as u64
    }

    /// Measures the item at `index` under `constraints`.
    pub fn measure_item(&self, index: usize, constraints: Constraints) -> Result<Vec<Placeable>, ItemMeasureError> {
        let (interval, local_index) = self.find_interval(index).ok_or(ItemMeasureError::OutOfRange {
            index,
            item_count: self.total_count,
        })?;
        (interval.content)(local_index, constraints)
    }

    /// Returns the index of an item with the given key, searching only within
    /// `range`.
    pub fn get_index_by_key_in_range(&self, key: u64, range: Range<usize>) -> Option<usize> {
        let start = range.start.min(self.total_count);
        let end = range.end.min(self.total_count);
        (start..end).find(|&index| self.get_key(index) == key)
    }

    /// Finds the interval containing the given global index and the local
    /// index within it.
    fn find_interval(&self, index: usize) -> Option<(&LazyStaggeredGridInterval, usize)> {
        if index >= self.total_count {
            return None;
        }

        let pos = self
            .intervals
            .partition_point(|interval| interval.start_index + interval.count <= index);
        let interval = self.intervals.get(pos)?;
        (index >= interval.start_index).then(|| (interval, index - interval.start_index))
    }
}

impl LazyLayoutItemProvider for LazyStaggeredGridIntervalContent {
    fn item_count(&self) -> usize {
        self.total_count
    }

    fn get_key(&self, index: usize) -> u64 {
        LazyStaggeredGridIntervalContent::get_key(self, index)
    }

    fn get_index(&self, key: u64) -> Option<usize> {
        self.get_index_by_key_in_range(key, 0..self.total_count)
    }
}

impl LazyStaggeredGridScope for LazyStaggeredGridIntervalContent {
    fn item<F>(&mut self, key: Option<u64>, content: F)
    where
        F: Fn(Constraints) -> Result<Vec<Placeable>, ItemMeasureError> + 'static,
    {
        self.intervals.push(LazyStaggeredGridInterval {
            start_index: self.total_count,
            count: 1,
            key: key.map(|k| Rc::new(move |_| k) as Rc<dyn Fn(usize) -> u64>),
            content: Rc::new(move |_: usize, constraints: Constraints| content(constraints)),
        });
        self.total_count += 1;
    }

    fn items<K, F>(&mut self, count: usize, key: Option<K>, item_content: F)
    where
        K: Fn(usize) -> u64 + 'static,
        F: Fn(usize, Constraints) -> Result<Vec<Placeable>, ItemMeasureError> + 'static,
    {
        if count == 0 {
            return;
        }

        self.intervals.push(LazyStaggeredGridInterval {
            start_index: self.total_count,
            count,
            key: key.map(|k| Rc::new(k) as Rc<dyn Fn(usize) -> u64>),
            content: Rc::new(item_content),
        });
        self.total_count += count;
    }
}

/// Extension trait for adding convenience methods to [`LazyStaggeredGridScope`].
pub trait LazyStaggeredGridScopeExt: LazyStaggeredGridScope {
    /// Adds items from a slice with an item-aware measure function.
    fn items_slice<T, F>(&mut self, items: &[T], item_content: F)
    where
        T: Clone + 'static,
        F: Fn(&T, Constraints) -> Result<Vec<Placeable>, ItemMeasureError> + 'static,
    {
        let items_clone: Vec<T> = items.to_vec();
        self.items(items.len(), None::<fn(usize) -> u64>, move |index, constraints| {
            let item = items_clone.get(index).ok_or(ItemMeasureError::OutOfRange {
                index,
                item_count: items_clone.len(),
            })?;
            item_content(item, constraints)
        });
    }
}

impl<T: LazyStaggeredGridScope + ?Sized> LazyStaggeredGridScopeExt for T {}
