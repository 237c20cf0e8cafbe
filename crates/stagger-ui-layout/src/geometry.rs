//! Integer sizes, offsets and the main/cross axis mapping.

use std::ops::{Add, Sub};

/// Size in whole pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntSize {
    pub width: i32,
    pub height: i32,
}

impl IntSize {
    pub const ZERO: IntSize = IntSize {
        width: 0,
        height: 0,
    };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Position in whole pixels, relative to the parent layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntOffset {
    pub x: i32,
    pub y: i32,
}

impl IntOffset {
    pub const ZERO: IntOffset = IntOffset { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for IntOffset {
    type Output = IntOffset;

    fn add(self, rhs: Self) -> Self::Output {
        IntOffset::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for IntOffset {
    type Output = IntOffset;

    fn sub(self, rhs: Self) -> Self::Output {
        IntOffset::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Scrolling direction of a lazy layout.
///
/// The main axis is the scrolling one; lanes divide the cross axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Extent of `size` along the scrolling axis.
    pub fn main_axis(self, size: IntSize) -> i32 {
        match self {
            Orientation::Vertical => size.height,
            Orientation::Horizontal => size.width,
        }
    }

    /// Extent of `size` across the scrolling axis.
    pub fn cross_axis(self, size: IntSize) -> i32 {
        match self {
            Orientation::Vertical => size.width,
            Orientation::Horizontal => size.height,
        }
    }

    /// Builds an offset from main/cross axis coordinates.
    pub fn offset(self, main_axis: i32, cross_axis: i32) -> IntOffset {
        match self {
            Orientation::Vertical => IntOffset::new(cross_axis, main_axis),
            Orientation::Horizontal => IntOffset::new(main_axis, cross_axis),
        }
    }

    /// Builds a size from main/cross axis extents.
    pub fn size(self, main_axis: i32, cross_axis: i32) -> IntSize {
        match self {
            Orientation::Vertical => IntSize::new(cross_axis, main_axis),
            Orientation::Horizontal => IntSize::new(main_axis, cross_axis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_mapping_vertical() {
        let size = IntSize::new(30, 70);
        assert_eq!(Orientation::Vertical.main_axis(size), 70);
        assert_eq!(Orientation::Vertical.cross_axis(size), 30);
        assert_eq!(Orientation::Vertical.offset(5, 9), IntOffset::new(9, 5));
    }

    #[test]
    fn test_axis_mapping_horizontal() {
        let size = IntSize::new(30, 70);
        assert_eq!(Orientation::Horizontal.main_axis(size), 30);
        assert_eq!(Orientation::Horizontal.cross_axis(size), 70);
        assert_eq!(Orientation::Horizontal.size(12, 4), IntSize::new(12, 4));
    }

    #[test]
    fn test_offset_arithmetic() {
        let a = IntOffset::new(3, 4);
        let b = IntOffset::new(1, 10);
        assert_eq!(a + b, IntOffset::new(4, 14));
        assert_eq!(a - b, IntOffset::new(2, -6));
    }
}
