use std::cell::RefCell;
use std::rc::Rc;

use stagger_foundation::{
    measure_lazy_staggered_grid, ItemMeasureError, LazyStaggeredGridIntervalContent,
    LazyStaggeredGridMeasureResult, LazyStaggeredGridScope, LazyStaggeredGridSpec,
    LazyStaggeredGridState, StaggeredGridCells, StaggeredGridError,
};
use stagger_ui_layout::{Constraints, Orientation, Placeable};

/// Drives a staggered grid of stub items through measure passes.
///
/// Each stub item reports a main-axis size read from a shared table at
/// measure time, so sizes can change between passes without rebuilding the
/// content. Placeables carry the item index as their node id.
pub struct StaggeredGridTestRule {
    state: LazyStaggeredGridState,
    spec: LazyStaggeredGridSpec,
    sizes: Rc<RefCell<Vec<i32>>>,
    measured: Rc<RefCell<Vec<usize>>>,
    content: LazyStaggeredGridIntervalContent,
    cross_axis_size: i32,
    viewport_size: i32,
    last_result: Option<LazyStaggeredGridMeasureResult>,
}

impl StaggeredGridTestRule {
    /// `lanes` fixed lanes of 100px each, one item per entry of `sizes`.
    pub fn new(lanes: usize, sizes: Vec<i32>, viewport_size: i32) -> Self {
        Self::with_spec(
            LazyStaggeredGridSpec::new(StaggeredGridCells::Fixed(lanes)),
            sizes,
            lanes as i32 * 100,
            viewport_size,
        )
    }

    /// `count` items of the same main-axis `size`.
    pub fn uniform(lanes: usize, count: usize, size: i32, viewport_size: i32) -> Self {
        Self::new(lanes, vec![size; count], viewport_size)
    }

    pub fn with_spec(
        spec: LazyStaggeredGridSpec,
        sizes: Vec<i32>,
        cross_axis_size: i32,
        viewport_size: i32,
    ) -> Self {
        let mut rule = Self {
            state: LazyStaggeredGridState::new(),
            spec,
            sizes: Rc::new(RefCell::new(sizes)),
            measured: Rc::new(RefCell::new(Vec::new())),
            content: LazyStaggeredGridIntervalContent::new(),
            cross_axis_size,
            viewport_size,
            last_result: None,
        };
        rule.rebuild_content();
        rule
    }

    fn rebuild_content(&mut self) {
        let sizes = Rc::clone(&self.sizes);
        let measured = Rc::clone(&self.measured);
        let orientation = self.spec.orientation;
        let count = sizes.borrow().len();

        let mut content = LazyStaggeredGridIntervalContent::new();
        content.items(count, None::<fn(usize) -> u64>, move |index, constraints| {
            measured.borrow_mut().push(index);
            let sizes = sizes.borrow();
            let main_axis = *sizes.get(index).ok_or(ItemMeasureError::OutOfRange {
                index,
                item_count: sizes.len(),
            })?;
            let size = orientation.size(main_axis, constraints.cross_axis_max(orientation));
            Ok(vec![Placeable::new(size.width, size.height).with_node(index as u64)])
        });
        self.content = content;
    }

    pub fn state(&self) -> &LazyStaggeredGridState {
        &self.state
    }

    pub fn spec(&self) -> &LazyStaggeredGridSpec {
        &self.spec
    }

    /// Replaces the grid spec, keeping the state.
    pub fn set_spec(&mut self, spec: LazyStaggeredGridSpec) {
        self.spec = spec;
        self.rebuild_content();
    }

    pub fn set_item_size(&self, index: usize, size: i32) {
        if let Some(slot) = self.sizes.borrow_mut().get_mut(index) {
            *slot = size;
        }
    }

    /// Truncates or extends the data set; new items get `size`.
    pub fn set_item_count(&mut self, count: usize, size: i32) {
        self.sizes.borrow_mut().resize(count, size);
        self.rebuild_content();
    }

    pub fn set_viewport_size(&mut self, viewport_size: i32) {
        self.viewport_size = viewport_size;
    }

    pub fn set_cross_axis_size(&mut self, cross_axis_size: i32) {
        self.cross_axis_size = cross_axis_size;
    }

    pub fn constraints(&self) -> Constraints {
        let size = self.spec.orientation.size(self.viewport_size, self.cross_axis_size);
        Constraints::loose(size.width, size.height)
    }

    pub fn try_measure(&mut self) -> Result<LazyStaggeredGridMeasureResult, StaggeredGridError> {
        let result = measure_lazy_staggered_grid(&self.content, &self.state, &self.spec, self.constraints())?;
        self.last_result = Some(result.clone());
        Ok(result)
    }

    /// Runs a measure pass, panicking on failure.
    pub fn measure(&mut self) -> LazyStaggeredGridMeasureResult {
        match self.try_measure() {
            Ok(result) => result,
            Err(error) => panic!("staggered grid measure failed: {error}"),
        }
    }

    /// Scrolls by `distance` (positive toward the end) and measures.
    pub fn scroll_by(&mut self, distance: f32) -> LazyStaggeredGridMeasureResult {
        self.state.scroll_by(distance);
        self.measure()
    }

    /// Dispatches a raw delta, bypassing the scroll guards, and measures.
    pub fn dispatch_scroll_delta(&mut self, delta: f32) -> LazyStaggeredGridMeasureResult {
        self.state.dispatch_scroll_delta(delta);
        self.measure()
    }

    pub fn last_result(&self) -> Option<&LazyStaggeredGridMeasureResult> {
        self.last_result.as_ref()
    }

    /// Number of item measurements since the last [`clear_measured`](Self::clear_measured).
    pub fn measure_count(&self) -> usize {
        self.measured.borrow().len()
    }

    /// Indices measured since the last [`clear_measured`](Self::clear_measured), in call order.
    pub fn measured_indices(&self) -> Vec<usize> {
        self.measured.borrow().clone()
    }

    pub fn clear_measured(&self) {
        self.measured.borrow_mut().clear();
    }

    /// Lane of `index` in the last committed layout, if it was visible.
    pub fn lane_of(&self, index: usize) -> Option<usize> {
        self.last_result
            .as_ref()?
            .positioned_items
            .iter()
            .find(|item| item.index == index)
            .map(|item| item.lane)
    }

    pub fn item_count(&self) -> usize {
        self.sizes.borrow().len()
    }

    pub fn orientation(&self) -> Orientation {
        self.spec.orientation
    }

    /// Asserts that item 0 is recorded in lane 0 whenever there is content.
    pub fn assert_first_item_in_lane_zero(&self) {
        if self.item_count() > 0 {
            assert_eq!(
                self.state.spans().get_span(0),
                Some(0),
                "item 0 must be assigned to lane 0"
            );
        }
    }
}

impl Default for StaggeredGridTestRule {
    fn default() -> Self {
        Self::uniform(2, 0, 100, 300)
    }
}
