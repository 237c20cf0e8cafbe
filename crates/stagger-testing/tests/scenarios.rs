use stagger_foundation::{LazyStaggeredGridSpec, StaggeredGridCells};
use stagger_testing::StaggeredGridTestRule;
use stagger_ui_layout::{IntOffset, IntSize, Orientation};

#[test]
fn round_robin_fill_of_equal_items() {
    let mut rule = StaggeredGridTestRule::uniform(3, 9, 100, 250);
    let result = rule.measure();

    assert_eq!(result.lane_indices(0), vec![0, 3, 6]);
    assert_eq!(result.lane_indices(1), vec![1, 4, 7]);
    assert_eq!(result.lane_indices(2), vec![2, 5, 8]);
    assert!(result.can_scroll_forward);
    assert!(!result.can_scroll_backward);
    assert_eq!(rule.measure_count(), 9);
    assert_eq!(result.positioned_items[4].offset, IntOffset::new(100, 100));
    rule.assert_first_item_in_lane_zero();
}

#[test]
fn scrolling_past_the_end_consumes_only_the_remaining_content() {
    let mut rule = StaggeredGridTestRule::uniform(3, 9, 100, 250);
    rule.measure();

    let result = rule.scroll_by(1000.0);

    assert_eq!(result.consumed_scroll, -50.0);
    assert_eq!(rule.state().last_consumed_scroll(), -50.0);
    assert_eq!(result.first_visible_item_indices.as_slice(), &[Some(0), Some(1), Some(2)]);
    assert_eq!(result.first_visible_item_scroll_offsets.as_slice(), &[50, 50, 50]);
    assert!(!result.can_scroll_forward);
    assert!(result.can_scroll_backward);

    // Nothing left to scroll toward the end.
    assert_eq!(rule.state().scroll_by(10.0), 0.0);
    assert_eq!(rule.state().scroll_to_be_consumed(), 0.0);
}

#[test]
fn growing_item_moves_missed_item_to_another_lane() {
    let mut rule = StaggeredGridTestRule::uniform(3, 7, 100, 1000);
    let first = rule.measure();
    assert_eq!(first.lane_indices(1), vec![1, 4]);
    assert_eq!(first.lane_indices(2), vec![2, 5]);

    rule.set_item_size(1, 500);
    let second = rule.measure();

    assert_eq!(second.restart_count, 1);
    assert_eq!(rule.lane_of(4), Some(2));
    assert_eq!(second.lane_indices(0), vec![0, 3, 6]);
    assert_eq!(second.lane_indices(1), vec![1]);
    assert_eq!(second.lane_indices(2), vec![2, 4, 5]);
    assert_eq!(rule.state().spans().get_span(4), Some(2));
    assert_eq!(rule.state().stats().restarts, 1);
}

#[test]
fn resizing_the_grid_changes_the_lane_count() {
    let spec = LazyStaggeredGridSpec::new(StaggeredGridCells::Adaptive(100));
    let mut rule = StaggeredGridTestRule::with_spec(spec, vec![100; 6], 300, 1000);

    let three = rule.measure();
    assert_eq!(three.lane_indices(2), vec![2, 5]);

    rule.set_cross_axis_size(200);
    let two = rule.measure();

    assert_eq!(two.first_visible_item_indices.len(), 2);
    assert_eq!(two.lane_indices(0), vec![0, 2, 4]);
    assert_eq!(two.lane_indices(1), vec![1, 3, 5]);
    assert_eq!(two.positioned_items[1].offset, IntOffset::new(100, 0));
    assert_eq!(two.restart_count, 0);
    rule.assert_first_item_in_lane_zero();
}

#[test]
fn resizing_while_scrolled_keeps_item_zero_in_lane_zero() {
    let spec = LazyStaggeredGridSpec::new(StaggeredGridCells::Adaptive(100));
    let mut rule = StaggeredGridTestRule::with_spec(spec, vec![100; 60], 200, 300);
    rule.measure();
    let scrolled = rule.scroll_by(1000.0);
    assert_eq!(scrolled.first_visible_item_indices.as_slice(), &[Some(20), Some(21)]);

    rule.set_cross_axis_size(300);
    let three = rule.measure();

    assert_eq!(three.first_visible_item_indices.as_slice(), &[Some(20), Some(21), Some(22)]);
    assert_eq!(three.first_visible_item_scroll_offsets.as_slice(), &[0, 0, 0]);
    assert!(three.can_scroll_backward);
    rule.assert_first_item_in_lane_zero();

    let top = rule.scroll_by(-5000.0);

    assert_eq!(top.first_visible_item_indices.as_slice(), &[Some(0), Some(1), Some(2)]);
    assert_eq!(top.first_visible_item_scroll_offsets.as_slice(), &[0, 0, 0]);
    assert_eq!(top.lane_indices(0)[0], 0);
    assert!(!top.can_scroll_backward);
    rule.assert_first_item_in_lane_zero();
}

#[test]
fn shrinking_the_data_set_pulls_the_position_back() {
    let mut rule = StaggeredGridTestRule::uniform(3, 9, 100, 250);
    rule.measure();
    rule.scroll_by(1000.0);

    rule.set_item_count(4, 100);
    let result = rule.measure();

    assert_eq!(result.total_items_count, 4);
    assert_eq!(result.first_visible_item_scroll_offsets.as_slice(), &[0, 0, 0]);
    let visible: Vec<usize> = result.positioned_items.iter().map(|item| item.index).collect();
    assert_eq!(visible, vec![0, 1, 2, 3]);
    assert!(!result.can_scroll_forward);
    assert!(!result.can_scroll_backward);
}

#[test]
fn scrolling_back_after_shrinking_realigns_lanes() {
    let mut rule = StaggeredGridTestRule::uniform(2, 20, 100, 200);
    rule.measure();
    let scrolled = rule.scroll_by(600.0);
    assert_eq!(scrolled.first_visible_item_indices.as_slice(), &[Some(12), Some(13)]);

    rule.set_item_count(5, 100);
    let shrunk = rule.measure();
    assert_eq!(shrunk.first_visible_item_indices.as_slice(), &[Some(2), Some(1)]);
    assert_eq!(shrunk.lane_indices(0), vec![2, 4]);
    assert_eq!(shrunk.lane_indices(1), vec![1, 3]);
    assert!(shrunk.can_scroll_backward);

    // Lane 1 runs out of earlier items before lane 0 does.
    let realigned = rule.scroll_by(-100.0);

    assert_eq!(realigned.restart_count, 1);
    assert_eq!(realigned.lane_indices(0), vec![0, 2, 4]);
    assert_eq!(realigned.lane_indices(1), vec![1, 3]);
    assert_eq!(realigned.first_visible_item_scroll_offsets.as_slice(), &[0, 0]);
    assert!(!realigned.can_scroll_backward);
    assert!(realigned.can_scroll_forward);
    rule.assert_first_item_in_lane_zero();
}

#[test]
fn empty_content_has_nothing_to_scroll() {
    let mut rule = StaggeredGridTestRule::uniform(3, 0, 100, 250);
    let result = rule.measure();

    assert!(result.positioned_items.is_empty());
    assert!(!result.can_scroll_forward);
    assert!(!result.can_scroll_backward);
    assert_eq!(result.total_items_count, 0);

    assert_eq!(rule.state().scroll_by(50.0), 0.0);
    assert!(rule.measure().positioned_items.is_empty());
}

#[test]
fn horizontal_grid_swaps_axes() {
    let spec = LazyStaggeredGridSpec::new(StaggeredGridCells::Fixed(2)).orientation(Orientation::Horizontal);
    let mut rule = StaggeredGridTestRule::with_spec(spec, vec![100; 6], 200, 250);
    let result = rule.measure();

    assert_eq!(result.orientation, Orientation::Horizontal);
    assert_eq!(result.positioned_items[0].size, IntSize::new(100, 100));
    assert_eq!(result.positioned_items[1].offset, IntOffset::new(0, 100));
    assert_eq!(result.positioned_items[2].offset, IntOffset::new(100, 0));
    assert_eq!(result.measure_result.size, IntSize::new(250, 200));

    let placement = result.measure_result.placements[3];
    assert_eq!(placement.node_id, Some(3));
    assert_eq!(placement.position, IntOffset::new(100, 100));
}

#[test]
fn leading_padding_keeps_items_composed() {
    let padded = LazyStaggeredGridSpec::new(StaggeredGridCells::Fixed(2)).content_padding(20, 20);
    let mut rule = StaggeredGridTestRule::with_spec(padded, vec![100; 12], 200, 300);
    rule.measure();
    let result = rule.scroll_by(110.0);

    assert_eq!(result.consumed_scroll, -110.0);
    assert_eq!(result.first_visible_item_indices.as_slice(), &[Some(0), Some(1)]);
    assert_eq!(result.first_visible_item_scroll_offsets.as_slice(), &[110, 110]);
    assert_eq!(result.positioned_items[0].offset.y, -110);
    assert_eq!(result.before_content_padding, 20);

    let mut bare = StaggeredGridTestRule::uniform(2, 12, 100, 300);
    bare.measure();
    let result = bare.scroll_by(110.0);

    assert_eq!(result.first_visible_item_indices.as_slice(), &[Some(2), Some(3)]);
    assert_eq!(result.first_visible_item_scroll_offsets.as_slice(), &[10, 10]);
}

#[test]
fn lane_without_visible_items_leaves_item_zero_in_place() {
    let mut rule = StaggeredGridTestRule::new(3, vec![140, 140, 12, 181, 101, 1], 1);
    rule.measure();
    rule.set_item_size(4, 2);

    let scrolled = rule.dispatch_scroll_delta(-193.0);

    assert_eq!(scrolled.first_visible_item_indices.as_slice(), &[None, Some(5), Some(3)]);
    let placed: Vec<(usize, usize, i32)> = scrolled
        .positioned_items
        .iter()
        .map(|item| (item.index, item.lane, item.offset.y))
        .collect();
    assert_eq!(placed, vec![(3, 2, -180), (5, 1, -52)]);
    rule.assert_first_item_in_lane_zero();

    for _ in 0..3 {
        let settled = rule.measure();
        assert_eq!(settled.positioned_items, scrolled.positioned_items);
        assert_eq!(settled.consumed_scroll, 0.0);
        rule.assert_first_item_in_lane_zero();
    }
}

#[test]
fn huge_scroll_delta_stops_at_the_content_bounds() {
    let mut rule = StaggeredGridTestRule::uniform(2, 20, 100, 200);
    rule.measure();
    rule.scroll_by(150.0);

    let end = rule.dispatch_scroll_delta(-3.0e9);

    assert_eq!(end.consumed_scroll, -650.0);
    assert_eq!(end.first_visible_item_indices.as_slice(), &[Some(16), Some(17)]);
    assert_eq!(end.first_visible_item_scroll_offsets.as_slice(), &[0, 0]);
    assert!(!end.can_scroll_forward);

    let start = rule.dispatch_scroll_delta(3.0e9);

    assert_eq!(start.consumed_scroll, 800.0);
    assert_eq!(start.first_visible_item_indices.as_slice(), &[Some(0), Some(1)]);
    assert_eq!(start.first_visible_item_scroll_offsets.as_slice(), &[0, 0]);
    assert!(!start.can_scroll_backward);
    rule.assert_first_item_in_lane_zero();
}
