//! Greedy randomized construction of a single tower.
//!
//! Blocks are taken from a pool ordered by decreasing footprint area. Most
//! rounds take the first block that fits on the current top and drop every
//! pool entry before it; the remaining rounds try a few random draws
//! instead. The result is one tower with no height limit. Not every block
//! is necessarily used.

mod config;
mod runner;

pub use config::GreedyConfig;
pub use runner::{GreedyResult, GreedyRunner, GreedyState};
