//! Foundation layer for lazy staggered grids.
//!
//! See [`lazy`] for the measurement engine and the state that drives it.

pub mod lazy;

pub use lazy::*;
