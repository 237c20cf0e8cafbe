//! Errors reported by the staggered grid host.
//!
//! The measurement pass itself is generic over the error of the item
//! measurement capability and propagates it unchanged. Lane misalignment is
//! repaired inside the pass and never shows up here.

use thiserror::Error;

/// Failure while measuring a single item from interval content.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ItemMeasureError {
    #[error("item {index} is out of range ({item_count} items)")]
    OutOfRange { index: usize, item_count: usize },

    #[error("item {index} failed to measure: {message}")]
    Failed { index: usize, message: String },
}

impl ItemMeasureError {
    pub fn failed(index: usize, message: impl Into<String>) -> Self {
        Self::Failed {
            index,
            message: message.into(),
        }
    }
}

/// Errors from [`measure_lazy_staggered_grid`](crate::lazy::measure_lazy_staggered_grid).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StaggeredGridError {
    #[error("staggered grid needs at least one lane")]
    NoLanes,

    #[error("adaptive cell min size must be positive, got {0}")]
    InvalidMinSize(i32),

    #[error("lanes cannot be resolved against an unbounded cross axis")]
    UnboundedCrossAxis,

    #[error("staggered grid was measured with an unbounded main axis")]
    UnboundedMainAxis,

    #[error(transparent)]
    ItemMeasure(#[from] ItemMeasureError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ItemMeasureError::failed(3, "boom").to_string(),
            "item 3 failed to measure: boom"
        );
        assert_eq!(
            StaggeredGridError::InvalidMinSize(-4).to_string(),
            "adaptive cell min size must be positive, got -4"
        );
    }

    #[test]
    fn test_item_error_converts_transparently() {
        let error: StaggeredGridError = ItemMeasureError::OutOfRange {
            index: 9,
            item_count: 4,
        }
        .into();
        assert_eq!(error.to_string(), "item 9 is out of range (4 items)");
    }
}
