//! Min/max size constraints passed from a parent to its children.

use crate::geometry::{IntSize, Orientation};

/// Marker for an unbounded maximum.
pub const INFINITY: i32 = i32::MAX;

/// Integer layout constraints.
///
/// `max_*` may be [`INFINITY`] for an unbounded axis. `min_*` is always finite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Constraints {
    pub min_width: i32,
    pub max_width: i32,
    pub min_height: i32,
    pub max_height: i32,
}

impl Default for Constraints {
    fn default() -> Self {
        Self::new(0, INFINITY, 0, INFINITY)
    }
}

impl Constraints {
    pub const fn new(min_width: i32, max_width: i32, min_height: i32, max_height: i32) -> Self {
        Self {
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }

    /// Exactly `width` x `height`.
    pub const fn fixed(width: i32, height: i32) -> Self {
        Self::new(width, width, height, height)
    }

    /// Exact width, unbounded height.
    pub const fn fixed_width(width: i32) -> Self {
        Self::new(width, width, 0, INFINITY)
    }

    /// Exact height, unbounded width.
    pub const fn fixed_height(height: i32) -> Self {
        Self::new(0, INFINITY, height, height)
    }

    /// Anything up to `width` x `height`.
    pub const fn loose(width: i32, height: i32) -> Self {
        Self::new(0, width, 0, height)
    }

    /// Constraints for a lazy layout item: the cross axis is fixed to the
    /// lane size while the scrolling axis stays unbounded.
    pub fn fixed_cross_axis(orientation: Orientation, cross_axis_size: i32) -> Self {
        match orientation {
            Orientation::Vertical => Self::fixed_width(cross_axis_size),
            Orientation::Horizontal => Self::fixed_height(cross_axis_size),
        }
    }

    pub fn has_bounded_width(&self) -> bool {
        self.max_width != INFINITY
    }

    pub fn has_bounded_height(&self) -> bool {
        self.max_height != INFINITY
    }

    /// Max extent along `orientation`'s main axis.
    pub fn main_axis_max(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Vertical => self.max_height,
            Orientation::Horizontal => self.max_width,
        }
    }

    /// Max extent across `orientation`'s main axis.
    pub fn cross_axis_max(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Vertical => self.max_width,
            Orientation::Horizontal => self.max_height,
        }
    }

    pub fn constrain_width(&self, width: i32) -> i32 {
        width.max(self.min_width).min(self.max_width)
    }

    pub fn constrain_height(&self, height: i32) -> i32 {
        height.max(self.min_height).min(self.max_height)
    }

    pub fn constrain(&self, size: IntSize) -> IntSize {
        IntSize::new(
            self.constrain_width(size.width),
            self.constrain_height(size.height),
        )
    }
}
