//! A single tower of blocks.
//!
//! A [`Tower`] stores [`BlockId`]s base-to-top (index 0 is the base) and
//! maintains two invariants:
//!
//! 1. every block is stackable on the block directly beneath it;
//! 2. the sum of heights never exceeds the height limit.
//!
//! Failure to place a block is reported as `None`, never as an error; the
//! tower is left untouched in that case.

use std::fmt;

use crate::block::{Block, BlockId, BlockSet};

/// Outcome of [`Tower::insert_displacing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Displacement {
    /// Position the block was inserted at.
    pub position: usize,
    /// Blocks removed from directly above the inserted block, bottom to top.
    pub orphans: Vec<BlockId>,
}

/// An ordered stack of blocks borrowed from a [`BlockSet`].
#[derive(Clone)]
pub struct Tower<'a> {
    set: &'a BlockSet,
    blocks: Vec<BlockId>,
    current_height: u64,
    height_limit: u64,
}

impl<'a> Tower<'a> {
    /// Creates an empty tower capped at `height_limit`.
    pub fn new(set: &'a BlockSet, height_limit: u64) -> Self {
        Self {
            set,
            blocks: Vec::new(),
            current_height: 0,
            height_limit,
        }
    }

    /// Creates an empty tower with no height limit.
    pub fn unbounded(set: &'a BlockSet) -> Self {
        Self::new(set, u64::MAX)
    }

    /// The arena this tower borrows from.
    pub fn block_set(&self) -> &'a BlockSet {
        self.set
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn current_height(&self) -> u64 {
        self.current_height
    }

    pub fn height_limit(&self) -> u64 {
        self.height_limit
    }

    /// Block ids base-to-top.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Blocks base-to-top.
    pub fn iter(&self) -> impl Iterator<Item = &'a Block> + '_ {
        let set = self.set;
        self.blocks.iter().map(move |&id| set.get(id))
    }

    pub fn base(&self) -> Option<BlockId> {
        self.blocks.first().copied()
    }

    pub fn top(&self) -> Option<BlockId> {
        self.blocks.last().copied()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains(&id)
    }

    /// Returns `true` if adding `id` keeps the tower within its limit.
    pub fn is_height_fit(&self, id: BlockId) -> bool {
        self.current_height
            .saturating_add(self.set[id].height() as u64)
            <= self.height_limit
    }

    /// Returns `true` if [`insert`](Self::insert) would accept `id`.
    pub fn is_fit(&self, id: BlockId) -> bool {
        self.find_slot(id).is_some()
    }

    /// Inserts a block, returning its position, or `None` if no slot fits.
    ///
    /// Candidate slots, in order: below the current base, between two
    /// adjacent blocks, on top. Existing blocks are never reordered.
    pub fn insert(&mut self, id: BlockId) -> Option<usize> {
        let position = self.find_slot(id)?;
        self.insert_at(position, id);
        Some(position)
    }

    /// Returns `true` if `id` can be appended on top.
    pub fn is_top_fit(&self, id: BlockId) -> bool {
        self.is_height_fit(id)
            && self
                .top()
                .is_none_or(|top| self.set[id].is_stackable_on(&self.set[top]))
    }

    /// Appends a block on top if it can rest on the current top.
    pub fn push(&mut self, id: BlockId) -> Option<usize> {
        if !self.is_top_fit(id) {
            return None;
        }
        let position = self.blocks.len();
        self.insert_at(position, id);
        Some(position)
    }

    /// Removes and returns the block at `position`.
    ///
    /// # Panics
    /// Panics if `position >= self.len()`.
    pub fn remove(&mut self, position: usize) -> BlockId {
        let id = self.blocks.remove(position);
        self.current_height -= self.set[id].height() as u64;
        id
    }

    /// Removes and returns the top block.
    pub fn pop(&mut self) -> Option<BlockId> {
        if self.blocks.is_empty() {
            None
        } else {
            Some(self.remove(self.blocks.len() - 1))
        }
    }

    /// Position `id` would take in [`insert_displacing`](Self::insert_displacing):
    /// directly above the highest block it can rest on, or the base.
    pub fn deepest_support(&self, id: BlockId) -> usize {
        let block = &self.set[id];
        self.blocks
            .iter()
            .rposition(|&b| block.is_stackable_on(&self.set[b]))
            .map_or(0, |i| i + 1)
    }

    /// Inserts `id` at its deepest supported position and evicts the run of
    /// blocks above it that cannot rest on it.
    ///
    /// The run ends at the first block stackable on `id`; that block and
    /// everything above it stay. Returns `None` (tower unchanged) if the
    /// result would exceed the height limit.
    pub fn insert_displacing(&mut self, id: BlockId) -> Option<Displacement> {
        let set = self.set;
        let block = &set[id];
        let position = self.deepest_support(id);
        let end = self.blocks[position..]
            .iter()
            .position(|&b| set[b].is_stackable_on(block))
            .map_or(self.blocks.len(), |i| position + i);

        let evicted: u64 = self.blocks[position..end]
            .iter()
            .map(|&b| set[b].height() as u64)
            .sum();
        let new_height = (self.current_height - evicted).saturating_add(block.height() as u64);
        if new_height > self.height_limit {
            return None;
        }

        let orphans: Vec<BlockId> = self.blocks.splice(position..end, [id]).collect();
        self.current_height = new_height;
        Some(Displacement { position, orphans })
    }

    /// Re-checks both invariants from scratch.
    pub fn is_valid(&self) -> bool {
        let stacked = self
            .blocks
            .windows(2)
            .all(|w| self.set[w[1]].is_stackable_on(&self.set[w[0]]));
        let height: u64 = self.iter().map(|b| b.height() as u64).sum();
        stacked && height == self.current_height && height <= self.height_limit
    }

    fn find_slot(&self, id: BlockId) -> Option<usize> {
        if !self.is_height_fit(id) {
            return None;
        }
        let block = &self.set[id];
        let (Some(base), Some(top)) = (self.base(), self.top()) else {
            return Some(0);
        };
        if self.set[base].is_stackable_on(block) {
            return Some(0);
        }
        for (i, pair) in self.blocks.windows(2).enumerate() {
            if block.is_stackable_on(&self.set[pair[0]])
                && self.set[pair[1]].is_stackable_on(block)
            {
                return Some(i + 1);
            }
        }
        if block.is_stackable_on(&self.set[top]) {
            return Some(self.blocks.len());
        }
        None
    }

    fn insert_at(&mut self, position: usize, id: BlockId) {
        self.current_height += self.set[id].height() as u64;
        self.blocks.insert(position, id);
    }
}

impl fmt::Debug for Tower<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tower")
            .field("blocks", &self.iter().collect::<Vec<_>>())
            .field("current_height", &self.current_height)
            .field("height_limit", &self.height_limit)
            .finish()
    }
}

/// Block count, then one `"height width depth"` line per block, base first.
impl fmt::Display for Tower<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.blocks.len())?;
        for block in self.iter() {
            write!(f, "\n{block}")?;
        }
        Ok(())
    }
}
