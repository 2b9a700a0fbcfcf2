//! Exact single-tower height maximization by dynamic programming.
//!
//! Computes, for every block, the tallest chain ending on it, then walks
//! back from the tallest chain's top. Requires the pool to be sorted by
//! decreasing footprint area: a block can only rest on a strictly larger
//! footprint, so every valid tower is an increasing index sequence. The
//! ordering is not verified.

mod runner;

pub use runner::{DpResult, DpRunner};
