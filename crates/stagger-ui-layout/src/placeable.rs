//! Measured children and the scope they are placed in.

use crate::geometry::{IntOffset, IntSize};

/// A measured child ready to be placed.
///
/// `node_id` identifies the backing node in the host tree, if there is one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placeable {
    pub width: i32,
    pub height: i32,
    pub node_id: Option<u64>,
}

impl Placeable {
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            node_id: None,
        }
    }

    pub const fn with_node(mut self, node_id: u64) -> Self {
        self.node_id = Some(node_id);
        self
    }

    pub const fn size(&self) -> IntSize {
        IntSize::new(self.width, self.height)
    }
}

/// Receives placement calls while a layout is committed.
pub trait PlacementScope {
    fn place(&mut self, placeable: &Placeable, position: IntOffset);
}

/// A single committed placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub node_id: Option<u64>,
    pub position: IntOffset,
    pub size: IntSize,
}

/// [`PlacementScope`] that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingPlacementScope {
    placements: Vec<Placement>,
}

impl RecordingPlacementScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_placements(self) -> Vec<Placement> {
        self.placements
    }
}

impl PlacementScope for RecordingPlacementScope {
    fn place(&mut self, placeable: &Placeable, position: IntOffset) {
        self.placements.push(Placement {
            node_id: placeable.node_id,
            position,
            size: placeable.size(),
        });
    }
}

/// Result of measuring a layout: its own size plus where its children went.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeasureResult {
    pub size: IntSize,
    pub placements: Vec<Placement>,
}

/// Commits a layout of `width` x `height`, running `place` to position the
/// children.
pub fn layout<F>(width: i32, height: i32, place: F) -> MeasureResult
where
    F: FnOnce(&mut dyn PlacementScope),
{
    let mut scope = RecordingPlacementScope::new();
    place(&mut scope);
    MeasureResult {
        size: IntSize::new(width, height),
        placements: scope.into_placements(),
    }
}
