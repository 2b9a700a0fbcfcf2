//! Tower manager: first-fit assignment, relocation and restacking.

use std::fmt;

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::Rng;

use super::config::ManagerConfig;
use crate::block::{BlockId, BlockSet};
use crate::random::rng_from_seed;
use crate::tower::Tower;

/// Order in which [`TowerManager::release`] empties the towers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Last tower first, each drained top to base.
    Vertical,
    /// One top block per tower per round.
    Horizontal,
    /// Towers sorted by block count, then horizontally.
    BySize {
        /// Sort by decreasing block count (otherwise increasing).
        smallest: bool,
    },
}

impl Release {
    /// Perturbations applied, in order, by each restack round.
    pub const RESTACK_SEQUENCE: [Release; 3] = [
        Release::Vertical,
        Release::Horizontal,
        Release::BySize { smallest: true },
    ];
}

/// Summary of [`TowerManager::pack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackResult {
    /// Towers after first-fit assignment.
    pub initial_towers: usize,
    /// Towers after the relocation passes.
    pub relocated_towers: usize,
    /// Towers after restacking.
    pub final_towers: usize,
    /// Blocks taller than the height limit on their own.
    pub unplaced: Vec<BlockId>,
}

/// Owns a set of towers sharing one height limit.
pub struct TowerManager<'a, R = StdRng> {
    set: &'a BlockSet,
    config: ManagerConfig,
    towers: Vec<Tower<'a>>,
    rng: R,
}

impl<'a> TowerManager<'a, StdRng> {
    /// Creates an empty manager seeded from `config.seed`.
    ///
    /// # Panics
    /// Panics if the configuration is invalid.
    pub fn new(set: &'a BlockSet, config: ManagerConfig) -> Self {
        let rng = rng_from_seed(config.seed);
        Self::with_rng(set, config, rng)
    }
}

impl<'a, R: Rng> TowerManager<'a, R> {
    /// Creates an empty manager driven by a caller-supplied random source.
    ///
    /// # Panics
    /// Panics if the configuration is invalid.
    pub fn with_rng(set: &'a BlockSet, config: ManagerConfig, rng: R) -> Self {
        config.validate().expect("invalid ManagerConfig");
        Self {
            set,
            config,
            towers: Vec::new(),
            rng,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn towers(&self) -> &[Tower<'a>] {
        &self.towers
    }

    pub fn tower_count(&self) -> usize {
        self.towers.len()
    }

    /// Number of blocks placed across all towers.
    pub fn block_count(&self) -> usize {
        self.towers.iter().map(Tower::len).sum()
    }

    pub fn into_towers(self) -> Vec<Tower<'a>> {
        self.towers
    }

    /// Places a block in the first tower that accepts it, opening a new
    /// tower if none does. Returns the tower index.
    ///
    /// A block taller than the height limit is rejected with `None`.
    pub fn insert_block(&mut self, id: BlockId) -> Option<usize> {
        for (i, tower) in self.towers.iter_mut().enumerate() {
            if tower.insert(id).is_some() {
                return Some(i);
            }
        }
        let mut tower = Tower::new(self.set, self.config.height_limit);
        if tower.insert(id).is_none() {
            warn!(
                "block {} exceeds the height limit {}",
                self.set[id], self.config.height_limit
            );
            return None;
        }
        self.towers.push(tower);
        Some(self.towers.len() - 1)
    }

    /// Relocates blocks towards later towers until a full pass moves
    /// nothing. Emptied towers are dropped after every pass. Returns the
    /// number of relocations.
    pub fn move_towers(&mut self) -> usize {
        let start = self.towers.len();
        let mut total = 0;
        loop {
            let before = self.towers.len();
            let mut moved = 0;
            for pos in 0..self.towers.len() {
                moved += self.move_tower(pos);
            }
            self.towers.retain(|t| !t.is_empty());
            total += moved;

            trace!("relocation pass: {moved} moved, {} towers", self.towers.len());
            if self.towers.len() < before && self.towers.len() < start {
                self.report("relocation");
            }
            if moved == 0 {
                return total;
            }
        }
    }

    /// One relocation sweep over the blocks of tower `pos`, base to top.
    fn move_tower(&mut self, pos: usize) -> usize {
        let mut moved = 0;
        let mut k = 0;
        while k < self.towers[pos].len() {
            let id = self.towers[pos].blocks()[k];
            let later = pos + 1..self.towers.len();
            let target = if self.rng.random::<f64>() < self.config.relocation_probability {
                later.clone().find(|&t| self.towers[t].is_fit(id))
            } else if !later.is_empty() {
                let t = self.rng.random_range(later);
                self.towers[t].is_fit(id).then_some(t)
            } else {
                None
            };

            match target {
                Some(t) => {
                    self.towers[pos].remove(k);
                    self.towers[t].insert(id);
                    moved += 1;
                }
                None => k += 1,
            }
        }
        moved
    }

    /// Empties every tower in the given order and returns the blocks in
    /// the order they were taken out.
    pub fn release(&mut self, order: Release) -> Vec<BlockId> {
        match order {
            Release::Vertical => self.release_vertical(),
            Release::Horizontal => self.release_horizontal(),
            Release::BySize { smallest } => self.release_by_size(smallest),
        }
    }

    /// Drains towers from last to first, each top to base.
    pub fn release_vertical(&mut self) -> Vec<BlockId> {
        let mut blocks = Vec::with_capacity(self.block_count());
        for tower in self.towers.iter_mut().rev() {
            while let Some(id) = tower.pop() {
                blocks.push(id);
            }
        }
        self.towers.clear();
        blocks
    }

    /// Takes the top block of every non-empty tower, round after round,
    /// until all towers are empty.
    pub fn release_horizontal(&mut self) -> Vec<BlockId> {
        let mut blocks = Vec::with_capacity(self.block_count());
        while !self.towers.is_empty() {
            for tower in &mut self.towers {
                if let Some(id) = tower.pop() {
                    blocks.push(id);
                }
            }
            self.towers.retain(|t| !t.is_empty());
        }
        blocks
    }

    /// Sorts towers by block count, largest first when `smallest` is set
    /// (so the smallest towers come last in every round), then releases
    /// horizontally.
    pub fn release_by_size(&mut self, smallest: bool) -> Vec<BlockId> {
        if smallest {
            self.towers.sort_by_key(|t| std::cmp::Reverse(t.len()));
        } else {
            self.towers.sort_by_key(Tower::len);
        }
        self.release_horizontal()
    }

    /// Re-admits released blocks first-fit, then relocates.
    pub fn reinsert(&mut self, blocks: Vec<BlockId>) {
        for id in blocks {
            self.insert_block(id);
        }
        self.move_towers();
    }

    /// Release-and-reinsert loop keeping the layout with the fewest towers.
    ///
    /// Each round applies [`Release::RESTACK_SEQUENCE`], reinserting after
    /// every release. Stops after `max_no_improve` rounds without a
    /// strictly smaller tower count and restores the best layout seen,
    /// so the count never increases. Returns the final count.
    pub fn restack(&mut self) -> usize {
        let mut best = self.towers.clone();
        let mut no_improve_count = 0;
        let mut rounds = 0;

        while no_improve_count < self.config.max_no_improve {
            no_improve_count += 1;
            rounds += 1;
            for order in Release::RESTACK_SEQUENCE {
                let blocks = self.release(order);
                self.reinsert(blocks);
                if self.towers.len() < best.len() {
                    best = self.towers.clone();
                    no_improve_count = 0;
                    self.report("restack");
                }
            }
        }

        self.towers = best;
        debug!("restack: {} towers after {rounds} rounds", self.towers.len());
        self.towers.len()
    }

    /// Packs `pool` from scratch: first-fit insertion, relocation, then
    /// restacking.
    ///
    /// Entries are taken from the head of the pool with
    /// `insertion_probability`, otherwise uniformly at random.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_stacking::{Block, BlockSet};
    /// use u_stacking::manager::{ManagerConfig, TowerManager};
    ///
    /// let mut set = BlockSet::new(vec![
    ///     Block::new(4, 3, 3),
    ///     Block::new(4, 9, 9),
    ///     Block::new(4, 5, 5),
    /// ]);
    /// set.sort_by_area_desc();
    /// let config = ManagerConfig::new(8).with_max_no_improve(5).with_seed(1);
    /// let mut manager = TowerManager::new(&set, config);
    /// let result = manager.pack(set.ids());
    /// assert_eq!(result.final_towers, 2);
    /// ```
    pub fn pack<I: IntoIterator<Item = BlockId>>(&mut self, pool: I) -> PackResult {
        let mut pool: Vec<BlockId> = pool.into_iter().collect();
        let mut unplaced = Vec::new();

        while !pool.is_empty() {
            let i = if self.rng.random::<f64>() < self.config.insertion_probability {
                0
            } else {
                self.rng.random_range(0..pool.len())
            };
            let id = pool.remove(i);
            if self.insert_block(id).is_none() {
                unplaced.push(id);
            }
        }
        let initial_towers = self.towers.len();

        self.move_towers();
        let relocated_towers = self.towers.len();

        let final_towers = self.restack();
        debug!(
            "pack: {initial_towers} towers after insertion, {relocated_towers} after relocation, {final_towers} after restack"
        );

        PackResult {
            initial_towers,
            relocated_towers,
            final_towers,
            unplaced,
        }
    }

    fn report(&self, phase: &str) {
        if self.config.log_updates {
            info!("{phase}: {} towers\n{}", self.towers.len(), self);
        } else {
            debug!("{phase}: {} towers", self.towers.len());
        }
    }
}

/// Every tower in the tower format, followed by a `fin` line.
impl<R> fmt::Display for TowerManager<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tower in &self.towers {
            writeln!(f, "{tower}")?;
        }
        write!(f, "fin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use std::collections::HashSet;

    fn manager(set: &BlockSet, config: ManagerConfig) -> TowerManager<'_> {
        TowerManager::new(set, config.with_seed(11))
    }

    /// Widths grow while depths shrink: no block fits on another.
    fn antichain(n: u32) -> BlockSet {
        (1..=n).map(|i| Block::new(1, i, n + 1 - i)).collect()
    }

    /// Two towers: `[a, b]` and `[c]`.
    fn two_towers() -> (BlockSet, Vec<BlockId>) {
        let set = BlockSet::new(vec![
            Block::new(1, 10, 10),
            Block::new(1, 5, 5),
            Block::new(1, 20, 1),
        ]);
        let ids = set.ids().collect();
        (set, ids)
    }

    fn fill<R: Rng>(manager: &mut TowerManager<'_, R>, ids: &[BlockId]) {
        for &id in ids {
            manager.insert_block(id).expect("fits");
        }
    }

    fn mixed(n: u32) -> BlockSet {
        let mut set: BlockSet = (1..=n)
            .map(|i| Block::new((i * 5) % 7 + 1, (i * 7) % 17 + 1, (i * 3) % 13 + 1))
            .collect();
        set.sort_by_area_desc();
        set
    }

    fn assert_partition(manager: &TowerManager<'_>, expected: usize) {
        let mut seen = HashSet::new();
        for tower in manager.towers() {
            assert!(tower.is_valid());
            assert!(!tower.is_empty());
            assert!(tower.current_height() <= manager.config().height_limit);
            for &id in tower.blocks() {
                assert!(seen.insert(id), "block {id:?} placed twice");
            }
        }
        assert_eq!(seen.len(), expected);
    }

    #[test]
    fn test_first_fit_antichain() {
        let set = antichain(6);
        let mut manager = manager(&set, ManagerConfig::new(100));
        for (i, id) in set.ids().enumerate() {
            assert_eq!(manager.insert_block(id), Some(i));
        }
        assert_eq!(manager.tower_count(), 6);
        assert!(manager.towers().iter().all(|t| t.len() == 1));
    }

    #[test]
    fn test_first_fit_prefers_earlier_tower() {
        let set = BlockSet::new(vec![
            Block::new(6, 9, 9),
            Block::new(6, 5, 5),
            Block::new(4, 3, 3),
        ]);
        let ids: Vec<BlockId> = set.ids().collect();
        let mut manager = manager(&set, ManagerConfig::new(10));
        assert_eq!(manager.insert_block(ids[0]), Some(0));
        assert_eq!(manager.insert_block(ids[1]), Some(1));
        assert_eq!(manager.insert_block(ids[2]), Some(0));
        assert_eq!(manager.towers()[0].blocks(), &[ids[0], ids[2]]);
    }

    #[test]
    fn test_too_tall_block_is_rejected() {
        let set = BlockSet::new(vec![Block::new(11, 2, 2)]);
        let mut manager = manager(&set, ManagerConfig::new(10));
        assert_eq!(manager.insert_block(BlockId::new(0)), None);
        assert_eq!(manager.tower_count(), 0);
    }

    #[test]
    fn test_move_towers_relocates_forward() {
        let set = BlockSet::new(vec![
            Block::new(5, 3, 3),
            Block::new(6, 8, 8),
            Block::new(4, 9, 9),
        ]);
        let ids: Vec<BlockId> = set.ids().collect();
        let config = ManagerConfig::new(10).with_relocation_probability(1.0);
        let mut manager = manager(&set, config);
        fill(&mut manager, &ids);
        assert_eq!(manager.towers()[0].blocks(), &[ids[2], ids[0]]);
        assert_eq!(manager.towers()[1].blocks(), &[ids[1]]);

        assert_eq!(manager.move_towers(), 1);
        assert_eq!(manager.towers()[0].blocks(), &[ids[0]]);
        assert_eq!(manager.towers()[1].blocks(), &[ids[2], ids[1]]);
    }

    #[test]
    fn test_move_towers_random_branch_keeps_partition() {
        let set = mixed(40);
        let config = ManagerConfig::new(15).with_relocation_probability(0.0);
        let mut manager = manager(&set, config);
        for id in set.ids() {
            manager.insert_block(id);
        }
        let before = manager.tower_count();
        manager.move_towers();
        assert!(manager.tower_count() <= before);
        assert_partition(&manager, set.len());
    }

    #[test]
    fn test_release_vertical_order() {
        let (set, ids) = two_towers();
        let mut manager = manager(&set, ManagerConfig::new(100));
        fill(&mut manager, &ids);
        assert_eq!(manager.tower_count(), 2);

        assert_eq!(manager.release_vertical(), vec![ids[2], ids[1], ids[0]]);
        assert_eq!(manager.tower_count(), 0);
    }

    #[test]
    fn test_release_horizontal_order() {
        let (set, ids) = two_towers();
        let mut manager = manager(&set, ManagerConfig::new(100));
        fill(&mut manager, &ids);

        assert_eq!(manager.release_horizontal(), vec![ids[1], ids[2], ids[0]]);
        assert_eq!(manager.tower_count(), 0);
    }

    #[test]
    fn test_release_by_size_order() {
        let (set, ids) = two_towers();
        let mut manager = manager(&set, ManagerConfig::new(100));

        fill(&mut manager, &ids);
        assert_eq!(manager.release_by_size(true), vec![ids[1], ids[2], ids[0]]);

        fill(&mut manager, &ids);
        assert_eq!(
            manager.release(Release::BySize { smallest: false }),
            vec![ids[2], ids[1], ids[0]]
        );
        assert_eq!(manager.tower_count(), 0);
    }

    #[test]
    fn test_reinsert_restores_all_blocks() {
        let set = mixed(30);
        let mut manager = manager(&set, ManagerConfig::new(12));
        for id in set.ids() {
            manager.insert_block(id);
        }
        let blocks = manager.release_horizontal();
        assert_eq!(blocks.len(), set.len());
        manager.reinsert(blocks);
        assert_partition(&manager, set.len());
    }

    #[test]
    fn test_restack_never_increases_count() {
        for seed in 0..5 {
            let set = mixed(35);
            let config = ManagerConfig::new(14).with_max_no_improve(10).with_seed(seed);
            let mut manager = TowerManager::new(&set, config);
            for id in set.ids() {
                manager.insert_block(id);
            }
            let before = manager.tower_count();
            let after = manager.restack();
            assert!(after <= before, "restack went from {before} to {after}");
            assert_eq!(after, manager.tower_count());
            assert_partition(&manager, set.len());
        }
    }

    #[test]
    fn test_restack_with_logging() {
        let set = mixed(20);
        let config = ManagerConfig::new(10)
            .with_max_no_improve(3)
            .with_log_updates(true);
        let mut manager = manager(&set, config);
        for id in set.ids() {
            manager.insert_block(id);
        }
        manager.restack();
        assert_partition(&manager, set.len());
    }

    #[test]
    fn test_pack_places_everything() {
        let mut set = mixed(50);
        set.sort_by_area_desc();
        let config = ManagerConfig::new(20).with_max_no_improve(10);
        let mut manager = manager(&set, config);

        let result = manager.pack(set.ids());

        assert!(result.unplaced.is_empty());
        assert!(result.relocated_towers <= result.initial_towers);
        assert!(result.final_towers <= result.relocated_towers);
        assert_eq!(result.final_towers, manager.tower_count());
        assert_partition(&manager, set.len());
    }

    #[test]
    fn test_pack_reports_unplaced() {
        let set = BlockSet::new(vec![Block::new(3, 4, 4), Block::new(30, 2, 2)]);
        let mut manager = manager(&set, ManagerConfig::new(10).with_max_no_improve(2));
        let result = manager.pack(set.ids());
        assert_eq!(result.unplaced, vec![BlockId::new(1)]);
        assert_eq!(result.final_towers, 1);
    }

    #[test]
    fn test_display() {
        let (set, ids) = two_towers();
        let mut manager = manager(&set, ManagerConfig::new(100));
        assert_eq!(manager.to_string(), "fin");
        fill(&mut manager, &ids);
        assert_eq!(manager.to_string(), "2\n1 10 10\n1 5 5\n1\n1 20 1\nfin");
    }
}
