//! Item → lane assignments for staggered grids.

/// Minimum number of slots allocated once the first span is stored.
const MIN_CAPACITY: usize = 16;

/// Tracks which lane each item was placed in.
///
/// Assignments persist across measure passes so that scrolling back finds
/// items in the lanes they were first laid out in. Entries are stored as
/// `lane + 1`, with `0` meaning unset; reads beyond the stored range are
/// unset as well.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LazyStaggeredGridSpans {
    spans: Vec<u32>,
}

impl LazyStaggeredGridSpans {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `index` to `lane`, or clears the assignment when `lane` is `None`.
    pub fn set_span(&mut self, index: usize, lane: Option<usize>) {
        match lane {
            Some(lane) => {
                self.ensure_capacity(index + 1);
                self.spans[index] = u32::try_from(lane + 1).unwrap_or(u32::MAX);
            }
            None => {
                if let Some(slot) = self.spans.get_mut(index) {
                    *slot = 0;
                }
            }
        }
    }

    /// Lane assigned to `index`, if any.
    pub fn get_span(&self, index: usize) -> Option<usize> {
        match self.spans.get(index) {
            Some(&stored) if stored != 0 => Some(stored as usize - 1),
            _ => None,
        }
    }

    /// Nearest index before `item` that belongs to `lane` or is unassigned.
    pub fn find_previous_item_index(&self, item: usize, lane: usize) -> Option<usize> {
        (0..item)
            .rev()
            .find(|&index| self.matches_lane(index, lane))
    }

    /// Nearest index after `item` (from 0 when `item` is `None`) that belongs
    /// to `lane` or is unassigned.
    ///
    /// When nothing in the stored range qualifies, returns the first index
    /// beyond it. The result is always greater than `item`.
    pub fn find_next_item_index(&self, item: Option<usize>, lane: usize) -> usize {
        let start = item.map_or(0, |item| item + 1);
        (start..self.spans.len())
            .find(|&index| self.matches_lane(index, lane))
            .unwrap_or_else(|| self.spans.len().max(start))
    }

    /// Clears every assignment.
    pub fn reset(&mut self) {
        self.spans.iter_mut().for_each(|slot| *slot = 0);
    }

    /// One past the highest index that may hold an assignment.
    pub fn upper_bound(&self) -> usize {
        self.spans.len()
    }

    fn matches_lane(&self, index: usize, lane: usize) -> bool {
        match self.get_span(index) {
            Some(assigned) => assigned == lane,
            None => true,
        }
    }

    fn ensure_capacity(&mut self, capacity: usize) {
        if self.spans.len() >= capacity {
            return;
        }
        let mut new_len = self.spans.len().max(MIN_CAPACITY);
        while new_len < capacity {
            new_len *= 2;
        }
        self.spans.resize(new_len, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_by_default() {
        let spans = LazyStaggeredGridSpans::new();
        assert_eq!(spans.get_span(0), None);
        assert_eq!(spans.get_span(1_000), None);
        assert_eq!(spans.upper_bound(), 0);
    }

    #[test]
    fn test_storage_grows_by_doubling() {
        let mut spans = LazyStaggeredGridSpans::new();
        spans.set_span(0, Some(0));
        assert_eq!(spans.upper_bound(), 16);

        spans.set_span(40, Some(2));
        assert_eq!(spans.upper_bound(), 64);
        assert_eq!(spans.get_span(40), Some(2));
        assert_eq!(spans.get_span(39), None);
    }

    #[test]
    fn test_unset_beyond_storage_is_noop() {
        let mut spans = LazyStaggeredGridSpans::new();
        spans.set_span(100, None);
        assert_eq!(spans.upper_bound(), 0);
    }

    #[test]
    fn test_find_previous_skips_other_lanes() {
        let mut spans = LazyStaggeredGridSpans::new();
        spans.set_span(0, Some(0));
        spans.set_span(1, Some(1));
        spans.set_span(2, Some(2));
        spans.set_span(3, Some(0));

        assert_eq!(spans.find_previous_item_index(3, 0), Some(0));
        assert_eq!(spans.find_previous_item_index(3, 2), Some(2));
        assert_eq!(spans.find_previous_item_index(1, 1), None);
        assert_eq!(spans.find_previous_item_index(0, 0), None);
    }

    #[test]
    fn test_find_previous_treats_unset_as_match() {
        let mut spans = LazyStaggeredGridSpans::new();
        spans.set_span(0, Some(0));
        spans.set_span(2, Some(1));

        assert_eq!(spans.find_previous_item_index(3, 0), Some(1));
        // Beyond the stored range everything is unset.
        assert_eq!(spans.find_previous_item_index(500, 1), Some(499));
    }

    #[test]
    fn test_find_next() {
        let mut spans = LazyStaggeredGridSpans::new();
        for index in 0..6 {
            spans.set_span(index, Some(index % 3));
        }

        assert_eq!(spans.find_next_item_index(None, 0), 0);
        assert_eq!(spans.find_next_item_index(None, 1), 1);
        assert_eq!(spans.find_next_item_index(Some(1), 1), 4);
        // Index 6 is the first unset slot.
        assert_eq!(spans.find_next_item_index(Some(4), 1), 6);
    }

    #[test]
    fn test_find_next_beyond_storage_probes_further() {
        let mut spans = LazyStaggeredGridSpans::new();
        for index in 0..16 {
            spans.set_span(index, Some(0));
        }

        assert_eq!(spans.find_next_item_index(Some(3), 1), 16);
        assert_eq!(spans.find_next_item_index(Some(20), 1), 21);
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut spans = LazyStaggeredGridSpans::new();
        spans.set_span(5, Some(1));
        spans.reset();
        assert_eq!(spans.get_span(5), None);
        assert_eq!(spans.upper_bound(), 16);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn model_matches(model: &[Option<usize>], index: usize, lane: usize) -> bool {
            match model.get(index).copied().flatten() {
                Some(assigned) => assigned == lane,
                None => true,
            }
        }

        proptest! {
            #[test]
            fn queries_agree_with_brute_force(
                assignments in prop::collection::vec((0usize..40, prop::option::of(0usize..4)), 0..60),
                item in 0usize..50,
                lane in 0usize..4,
            ) {
                let mut spans = LazyStaggeredGridSpans::new();
                let mut model: Vec<Option<usize>> = vec![None; 64];
                for &(index, assigned) in &assignments {
                    spans.set_span(index, assigned);
                    model[index] = assigned;
                }

                for index in 0..50 {
                    prop_assert_eq!(spans.get_span(index), model[index]);
                }

                let expected_previous = (0..item).rev().find(|&i| model_matches(&model, i, lane));
                prop_assert_eq!(spans.find_previous_item_index(item, lane), expected_previous);

                let next = spans.find_next_item_index(Some(item), lane);
                prop_assert!(next > item);
                for skipped in item + 1..next.min(spans.upper_bound()) {
                    prop_assert!(!model_matches(&model, skipped, lane));
                }
                if next < spans.upper_bound() {
                    prop_assert!(model_matches(&model, next, lane));
                }
            }
        }
    }
}
