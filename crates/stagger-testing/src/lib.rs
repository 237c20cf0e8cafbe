//! Harness for exercising the staggered grid outside a host UI tree.

pub mod test_rule;

pub use test_rule::*;
