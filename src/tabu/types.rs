//! Tabu memory and moves.

use std::collections::HashMap;

use crate::block::BlockId;

/// An evaluated "insert and displace" move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackMove {
    /// Block dropped into the tower.
    pub block: BlockId,
    /// Blocks evicted from directly above it.
    pub orphans: Vec<BlockId>,
    /// Tower height after the move.
    pub height: u64,
}

/// Per-block cooldowns. A block without an entry is not tabu.
#[derive(Debug, Clone, Default)]
pub struct TabuList {
    cooldowns: HashMap<BlockId, u32>,
}

impl TabuList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tabu(&self, id: BlockId) -> bool {
        self.cooldowns.contains_key(&id)
    }

    /// Remaining iterations before `id` is released.
    pub fn cooldown(&self, id: BlockId) -> Option<u32> {
        self.cooldowns.get(&id).copied()
    }

    /// Makes `id` tabu for `cooldown` iterations, replacing any previous
    /// cooldown. A zero cooldown releases it.
    pub fn mark(&mut self, id: BlockId, cooldown: u32) {
        if cooldown == 0 {
            self.cooldowns.remove(&id);
        } else {
            self.cooldowns.insert(id, cooldown);
        }
    }

    /// Decrements every cooldown and releases the blocks reaching zero.
    pub fn tick(&mut self) {
        self.cooldowns.retain(|_, c| {
            *c -= 1;
            *c > 0
        });
    }

    pub fn len(&self) -> usize {
        self.cooldowns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cooldowns.is_empty()
    }
}
