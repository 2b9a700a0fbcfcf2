//! Greedy construction loop.

use log::debug;
use rand::Rng;

use super::config::GreedyConfig;
use crate::block::{BlockId, BlockSet};
use crate::random::rng_from_seed;
use crate::tower::Tower;

/// Result of a greedy construction.
#[derive(Debug, Clone)]
pub struct GreedyResult<'a> {
    /// The constructed tower.
    pub tower: Tower<'a>,
    /// Height of the tower.
    pub height: u64,
    /// Number of rounds executed.
    pub rounds: usize,
    /// Random rounds in which no draw fitted.
    pub wasted_rounds: usize,
    /// Pool entries dropped by first-fit rounds without being placed.
    pub discarded: usize,
}

/// Tower under construction plus the pool it draws from.
#[derive(Debug, Clone)]
pub struct GreedyState<'a> {
    tower: Tower<'a>,
    pool: Vec<BlockId>,
    discarded: usize,
}

impl<'a> GreedyState<'a> {
    /// Starts from `tower` (possibly non-empty) and a pool in area order.
    pub fn new(tower: Tower<'a>, pool: Vec<BlockId>) -> Self {
        Self {
            tower,
            pool,
            discarded: 0,
        }
    }

    pub fn tower(&self) -> &Tower<'a> {
        &self.tower
    }

    pub fn pool(&self) -> &[BlockId] {
        &self.pool
    }

    pub fn is_done(&self) -> bool {
        self.pool.is_empty()
    }

    /// First-fit round: places the first pool entry that fits on top.
    ///
    /// Every entry before it is dropped from the pool for good. When no
    /// entry fits, the whole pool is dropped.
    pub fn take_first_fit(&mut self) -> Option<BlockId> {
        match self.pool.iter().position(|&id| self.tower.is_top_fit(id)) {
            Some(i) => {
                let id = self.pool[i];
                self.tower.push(id);
                self.discarded += i;
                self.pool.drain(..=i);
                Some(id)
            }
            None => {
                self.discarded += self.pool.len();
                self.pool.clear();
                None
            }
        }
    }

    /// Random round: up to `attempts` uniform draws, placing the first one
    /// that fits. Only the placed entry leaves the pool.
    pub fn take_random<R: Rng>(&mut self, attempts: usize, rng: &mut R) -> Option<BlockId> {
        if self.pool.is_empty() {
            return None;
        }
        for _ in 0..attempts {
            let i = rng.random_range(0..self.pool.len());
            let id = self.pool[i];
            if self.tower.push(id).is_some() {
                self.pool.remove(i);
                return Some(id);
            }
        }
        None
    }

    fn into_result(self, rounds: usize, wasted_rounds: usize) -> GreedyResult<'a> {
        GreedyResult {
            height: self.tower.current_height(),
            tower: self.tower,
            rounds,
            wasted_rounds,
            discarded: self.discarded,
        }
    }
}

/// Greedy randomized construction runner.
pub struct GreedyRunner;

impl GreedyRunner {
    /// Builds one unbounded tower from `set`, taken as area-descending.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_stacking::{Block, BlockSet};
    /// use u_stacking::greedy::{GreedyConfig, GreedyRunner};
    ///
    /// let set = BlockSet::new(vec![
    ///     Block::new(1, 3, 3),
    ///     Block::new(1, 2, 2),
    ///     Block::new(1, 1, 1),
    /// ]);
    /// let config = GreedyConfig::default().with_deterministic_probability(1.0);
    /// let result = GreedyRunner::run(&set, &config);
    /// assert_eq!(result.height, 3);
    /// ```
    ///
    /// # Panics
    /// Panics if the configuration is invalid.
    pub fn run<'a>(set: &'a BlockSet, config: &GreedyConfig) -> GreedyResult<'a> {
        let mut rng = rng_from_seed(config.seed);
        Self::run_with_rng(set, config, &mut rng)
    }

    /// Same as [`run`](Self::run) with a caller-supplied random source.
    pub fn run_with_rng<'a, R: Rng>(
        set: &'a BlockSet,
        config: &GreedyConfig,
        rng: &mut R,
    ) -> GreedyResult<'a> {
        let state = GreedyState::new(Tower::unbounded(set), set.ids().collect());
        Self::complete(state, config, rng)
    }

    /// Runs rounds on `state` until its pool is exhausted.
    pub fn complete<'a, R: Rng>(
        mut state: GreedyState<'a>,
        config: &GreedyConfig,
        rng: &mut R,
    ) -> GreedyResult<'a> {
        config.validate().expect("invalid GreedyConfig");

        let mut rounds = 0;
        let mut wasted_rounds = 0;
        while !state.is_done() {
            rounds += 1;
            if rng.random::<f64>() < config.deterministic_probability {
                state.take_first_fit();
            } else if state.take_random(config.random_attempts, rng).is_none() {
                wasted_rounds += 1;
            }
        }

        let result = state.into_result(rounds, wasted_rounds);
        debug!(
            "greedy: height {} with {} blocks after {} rounds ({} discarded, {} wasted)",
            result.height,
            result.tower.len(),
            result.rounds,
            result.discarded,
            result.wasted_rounds
        );
        result
    }
}
