//! Layout contracts shared by the lazy layouts.
//!
//! Everything here works in whole pixels: lazy measurement rounds the pending
//! scroll delta once per pass and keeps every offset as an `i32` so that
//! repeated passes never accumulate drift.

mod constraints;
mod geometry;
mod placeable;

pub use constraints::*;
pub use geometry::*;
pub use placeable::*;
