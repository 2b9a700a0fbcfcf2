//! Longest weighted chain over the stackability order.

use log::debug;

use crate::block::{BlockId, BlockSet};

/// Result of the dynamic program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpResult {
    /// Best achievable height.
    pub height: u64,
    /// Reconstructed chain, base to top.
    pub blocks: Vec<BlockId>,
    /// Best chain height ending at each block, in pool order.
    pub chain_heights: Vec<u64>,
}

/// Dynamic programming runner.
pub struct DpRunner;

impl DpRunner {
    /// Runs the dynamic program on an area-descending pool.
    ///
    /// Reconstruction matches chain heights only: from the top block it
    /// looks for the closest earlier block whose chain height equals the
    /// height still missing, without re-checking stackability. Pools with
    /// repeated chain heights can therefore produce a chain of optimal
    /// height whose blocks do not all stack.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_stacking::{Block, BlockSet};
    /// use u_stacking::dp::DpRunner;
    ///
    /// let set = BlockSet::new(vec![
    ///     Block::new(1, 3, 3),
    ///     Block::new(1, 2, 2),
    ///     Block::new(1, 1, 1),
    /// ]);
    /// assert_eq!(DpRunner::run(&set).height, 3);
    /// ```
    pub fn run(set: &BlockSet) -> DpResult {
        let blocks: Vec<_> = set.iter().map(|(_, b)| *b).collect();
        let mut chain_heights: Vec<u64> = Vec::with_capacity(blocks.len());

        for (j, top) in blocks.iter().enumerate() {
            let below = (0..j)
                .filter(|&i| top.is_stackable_on(&blocks[i]))
                .map(|i| chain_heights[i])
                .max()
                .unwrap_or(0);
            chain_heights.push(top.height() as u64 + below);
        }

        // Ties resolve to the last index.
        let tallest = chain_heights
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|&(_, h)| h);
        let Some((top, height)) = tallest else {
            return DpResult {
                height: 0,
                blocks: Vec::new(),
                chain_heights,
            };
        };

        let mut chain = vec![BlockId::new(top)];
        let mut remaining = height - blocks[top].height() as u64;
        let mut cursor = top;
        while remaining > 0 {
            match (0..cursor).rev().find(|&i| chain_heights[i] == remaining) {
                Some(i) => {
                    chain.push(BlockId::new(i));
                    remaining -= blocks[i].height() as u64;
                    cursor = i;
                }
                None => break,
            }
        }
        chain.reverse();

        debug!("dp: height {} with {} blocks", height, chain.len());
        DpResult {
            height,
            blocks: chain,
            chain_heights,
        }
    }
}
