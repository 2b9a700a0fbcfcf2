//! Blocks and the arena that owns them.
//!
//! A [`Block`] is an immutable `(height, width, depth)` record. All blocks
//! of an instance live in a [`BlockSet`]; towers and algorithms refer to
//! them through [`BlockId`] handles and never copy the values.

use std::fmt;
use std::ops::Index;

/// A rectangular block.
///
/// The footprint of a block is its `(width, depth)` pair. A block can rest
/// on another only if both footprint dimensions are strictly smaller.
///
/// # Examples
///
/// ```
/// use u_stacking::Block;
///
/// let small = Block::new(3, 1, 1);
/// let large = Block::new(1, 2, 2);
/// assert!(small.is_stackable_on(&large));
/// assert!(!large.is_stackable_on(&small));
/// assert!(!small.is_stackable_on(&small));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    height: u32,
    width: u32,
    depth: u32,
}

impl Block {
    /// Creates a block from its three dimensions.
    pub const fn new(height: u32, width: u32, depth: u32) -> Self {
        Self {
            height,
            width,
            depth,
        }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Footprint area, `width * depth`.
    pub fn surface_area(&self) -> f64 {
        self.width as f64 * self.depth as f64
    }

    /// Returns `true` if `self` may rest directly on `other`.
    ///
    /// This is a strict partial order: irreflexive, transitive, and
    /// blocks with incomparable footprints are mutually non-stackable.
    pub fn is_stackable_on(&self, other: &Block) -> bool {
        self.width < other.width && self.depth < other.depth
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.height, self.width, self.depth)
    }
}

/// Handle to a block stored in a [`BlockSet`].
///
/// Identity is positional: two equal blocks at different positions have
/// distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockId(usize);

impl BlockId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the block in its set.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena of immutable blocks.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockSet {
    blocks: Vec<Block>,
}

impl BlockSet {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Looks up a block.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this set.
    pub fn get(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    /// All ids in storage order.
    pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        (0..self.blocks.len()).map(BlockId)
    }

    /// All `(id, block)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &Block)> + '_ {
        self.blocks.iter().enumerate().map(|(i, b)| (BlockId(i), b))
    }

    /// Sum of all block heights.
    pub fn total_height(&self) -> u64 {
        self.blocks.iter().map(|b| b.height as u64).sum()
    }

    /// Reorders the blocks by decreasing footprint area.
    ///
    /// The sort is stable. Ids issued before the call refer to positions,
    /// so they must not be reused afterwards.
    pub fn sort_by_area_desc(&mut self) {
        self.blocks.sort_by(|a, b| {
            b.surface_area()
                .partial_cmp(&a.surface_area())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// Returns `true` if the blocks are ordered by non-increasing area.
    pub fn is_sorted_by_area_desc(&self) -> bool {
        self.blocks
            .windows(2)
            .all(|w| w[0].surface_area() >= w[1].surface_area())
    }
}

impl Index<BlockId> for BlockSet {
    type Output = Block;

    fn index(&self, id: BlockId) -> &Block {
        self.get(id)
    }
}

impl FromIterator<Block> for BlockSet {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
