//! Heuristics for the block-stacking problem.
//!
//! Given rectangular blocks `(height, width, depth)`, build towers in which
//! every block rests on a block with a strictly larger footprint. Two
//! problem variants are covered:
//!
//! - **Single tower, no height limit**: maximize the tower height.
//!   - [`greedy`]: randomized first-fit construction.
//!   - [`dp`]: exact dynamic programming over an area-sorted pool.
//!   - [`tabu`]: Tabu Search seeded by the greedy construction.
//! - **Many towers, shared height limit**: use as few towers as possible.
//!   - [`manager`]: first-fit assignment, relocation and restacking.
//!
//! # Architecture
//!
//! Blocks live in a [`BlockSet`] arena and are referred to by [`BlockId`].
//! A [`Tower`] borrows the arena and enforces the stacking invariants.
//! Every randomized runner takes a seed in its config or an explicit
//! [`rand::Rng`], and none keeps global state.

pub mod block;
pub mod codec;
pub mod dp;
pub mod greedy;
pub mod manager;
pub mod random;
pub mod tabu;
pub mod tower;

pub use block::{Block, BlockId, BlockSet};
pub use tower::{Displacement, Tower};
