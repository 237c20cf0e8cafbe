//! Scrolls a photo-wall style staggered grid and prints every pass.
//!
//! Run with:
//! ```bash
//! cargo run --package staggered-demo --features logging
//! ```
//!
//! Set `RUST_LOG=stagger_foundation=trace` to see the engine's pass log.

use anyhow::Context;
use stagger_foundation::{
    measure_lazy_staggered_grid, LazyStaggeredGridIntervalContent, LazyStaggeredGridMeasureResult,
    LazyStaggeredGridScope, LazyStaggeredGridSpec, LazyStaggeredGridState, StaggeredGridCells,
};
use stagger_ui_layout::{Constraints, Placeable};

const ITEM_COUNT: usize = 60;
const VIEWPORT_WIDTH: i32 = 360;
const VIEWPORT_HEIGHT: i32 = 640;

fn tile_height(index: usize) -> i32 {
    // Deterministic spread of aspect ratios.
    80 + ((index * 53) % 7) as i32 * 30
}

fn build_content() -> LazyStaggeredGridIntervalContent {
    let mut content = LazyStaggeredGridIntervalContent::new();
    content.item(Some(u64::MAX), |constraints| {
        Ok(vec![Placeable::new(constraints.max_width, 48)])
    });
    content.items(
        ITEM_COUNT,
        Some(|index| 1_000 + index as u64),
        |index, constraints| Ok(vec![Placeable::new(constraints.max_width, tile_height(index))]),
    );
    content
}

fn print_pass(label: &str, result: &LazyStaggeredGridMeasureResult) {
    println!(
        "{label}: consumed {:.0}, first {:?}, offsets {:?}, restarts {}",
        result.consumed_scroll,
        result.first_visible_item_indices.as_slice(),
        result.first_visible_item_scroll_offsets.as_slice(),
        result.restart_count
    );
    for item in &result.positioned_items {
        println!(
            "  #{:<3} key {:<5} lane {} at ({:>4}, {:>5}) {}x{}",
            item.index, item.key, item.lane, item.offset.x, item.offset.y, item.size.width, item.size.height
        );
    }
    println!(
        "  forward {} backward {}",
        result.can_scroll_forward, result.can_scroll_backward
    );
}

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    env_logger::init();

    let content = build_content();
    let state = LazyStaggeredGridState::new();
    let spec = LazyStaggeredGridSpec::new(StaggeredGridCells::Adaptive(110)).content_padding(8, 8);
    let constraints = Constraints::loose(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);

    let result = measure_lazy_staggered_grid(&content, &state, &spec, constraints)
        .context("initial staggered grid pass")?;
    print_pass("initial", &result);

    for step in 1..=4 {
        state.scroll_by(450.0);
        let result = measure_lazy_staggered_grid(&content, &state, &spec, constraints)
            .with_context(|| format!("scroll pass {step}"))?;
        print_pass(&format!("scroll {step}"), &result);
        println!("  prefetch {:?}", state.take_prefetch_indices());
    }

    state.scroll_to_item(30, 0);
    let result = measure_lazy_staggered_grid(&content, &state, &spec, constraints)
        .context("scroll to item pass")?;
    print_pass("scroll to #30", &result);

    let stats = state.stats();
    log::info!(
        "{} passes, {} restarts, {} items measured",
        stats.measure_passes,
        stats.restarts,
        stats.items_measured
    );
    println!(
        "{} passes, {} restarts, {} items measured, last pass {:?}",
        stats.measure_passes, stats.restarts, stats.items_measured, stats.last_pass_duration
    );
    Ok(())
}
