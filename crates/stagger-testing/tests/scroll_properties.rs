use proptest::prelude::*;
use stagger_foundation::LazyStaggeredGridMeasureResult;
use stagger_testing::StaggeredGridTestRule;

#[test]
fn zero_delta_pass_is_idempotent() {
    let mut rule = StaggeredGridTestRule::uniform(3, 30, 100, 250);
    rule.measure();
    let scrolled = rule.scroll_by(130.0);

    let again = rule.measure();

    assert_eq!(again.positioned_items, scrolled.positioned_items);
    assert_eq!(again.first_visible_item_indices, scrolled.first_visible_item_indices);
    assert_eq!(again.first_visible_item_scroll_offsets, scrolled.first_visible_item_scroll_offsets);
    assert_eq!(again.consumed_scroll, 0.0);
}

#[test]
fn reversing_consumed_scroll_restores_position() {
    let mut rule = StaggeredGridTestRule::uniform(3, 30, 100, 250);
    rule.measure();
    let start = rule.state().scroll_position();

    let forward = rule.scroll_by(130.0);
    assert_eq!(forward.consumed_scroll, -130.0);
    assert_eq!(forward.first_visible_item_indices.as_slice(), &[Some(3), Some(4), Some(5)]);
    assert_eq!(forward.first_visible_item_scroll_offsets.as_slice(), &[30, 30, 30]);

    let back = rule.dispatch_scroll_delta(-forward.consumed_scroll);

    assert_eq!(back.consumed_scroll, 130.0);
    assert_eq!(rule.state().scroll_position(), start);
}

#[test]
fn only_visible_items_are_measured_after_scrolling() {
    let mut rule = StaggeredGridTestRule::uniform(3, 1000, 100, 250);
    rule.measure();
    rule.clear_measured();

    rule.scroll_by(130.0);

    // The three previously first items are measured and dropped.
    let measured = rule.measured_indices();
    assert_eq!(measured, (0..12).collect::<Vec<_>>());
}

fn visible_indices(result: &LazyStaggeredGridMeasureResult) -> Vec<usize> {
    result.positioned_items.iter().map(|item| item.index).collect()
}

proptest! {
    #[test]
    fn uniform_rows_keep_invariants_while_scrolling(
        lanes in 1usize..5,
        rows in 1usize..30,
        size in 20i32..200,
        viewport in 50i32..600,
        distances in prop::collection::vec(-800i32..800, 1..12),
    ) {
        let mut rule = StaggeredGridTestRule::uniform(lanes, lanes * rows, size, viewport);
        rule.measure();

        for distance in distances {
            let result = rule.scroll_by(distance as f32);
            rule.assert_first_item_in_lane_zero();

            let indices = visible_indices(&result);
            prop_assert!(!indices.is_empty());
            prop_assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
            prop_assert!(result.first_visible_item_scroll_offsets.iter().all(|&offset| offset >= 0));
            prop_assert!(result.consumed_scroll.abs() <= distance.abs() as f32);
            prop_assert_eq!(
                result.can_scroll_backward,
                !(result.first_visible_item_indices[0] == Some(0)
                    && result.first_visible_item_scroll_offsets[0] == 0)
            );

            let again = rule.measure();
            prop_assert_eq!(&again.positioned_items, &result.positioned_items);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn resized_items_settle_in_one_pass(
        lanes in 1usize..5,
        sizes in prop::collection::vec(50i32..150, 1000),
        viewport in 100i32..500,
        steps in prop::collection::vec(
            (-300i32..300, prop::option::of((0usize..400, 50i32..150))),
            1..12,
        ),
    ) {
        let mut rule = StaggeredGridTestRule::new(lanes, sizes, viewport);
        rule.measure();

        for (distance, resize) in steps {
            if let Some((index, size)) = resize {
                rule.set_item_size(index, size);
            }
            let result = rule.scroll_by(distance as f32);
            prop_assert!(result.restart_count <= 1);
            prop_assert_eq!(rule.state().spans().get_span(0), Some(0));

            let settled = rule.measure();
            let again = rule.measure();
            prop_assert_eq!(rule.state().spans().get_span(0), Some(0));
            prop_assert_eq!(&again.positioned_items, &settled.positioned_items);
        }
    }

    #[test]
    fn reversing_scroll_restores_position_with_mixed_sizes(
        lanes in 1usize..5,
        sizes in prop::collection::vec(50i32..150, 1000),
        viewport in 100i32..500,
        start in 0i32..2000,
        distance in 1i32..1500,
    ) {
        let mut rule = StaggeredGridTestRule::new(lanes, sizes, viewport);
        rule.measure();
        rule.scroll_by(start as f32);
        let before = rule.state().scroll_position();

        let forward = rule.scroll_by(distance as f32);
        prop_assert_eq!(forward.consumed_scroll, -(distance as f32));
        rule.dispatch_scroll_delta(-forward.consumed_scroll);

        prop_assert_eq!(rule.state().scroll_position(), before);
    }
}
