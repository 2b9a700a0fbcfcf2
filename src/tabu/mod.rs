//! Tabu Search for a single tower.
//!
//! Starts from a greedy tower and repeatedly applies the best "insert and
//! displace" move: a block is dropped into the deepest position that
//! supports it and the blocks above it that no longer fit are evicted.
//! Recently moved blocks are tabu for a random number of iterations, which
//! keeps the search from immediately undoing its own moves.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod runner;
mod types;

pub use config::TabuConfig;
pub use runner::{TabuResult, TabuRunner};
pub use types::{StackMove, TabuList};
