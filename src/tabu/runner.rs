//! Tabu Search execution engine.
//!
//! # Algorithm
//!
//! 1. Build an initial tower greedily
//! 2. At each iteration:
//!    a. Collect candidates: blocks in the tower, or not tabu
//!    b. Score each candidate's insert-and-displace move on a copy
//!    c. Commit the highest-scoring move (ties go to the later candidate)
//!    d. Make the inserted and evicted blocks tabu
//!    e. Update the best tower, then age the tabu list
//! 3. Terminate after stagnation (or the optional iteration cap)

use std::collections::HashSet;

use log::{debug, trace};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::TabuConfig;
use super::types::{StackMove, TabuList};
use crate::block::{BlockId, BlockSet};
use crate::greedy::GreedyRunner;
use crate::random::rng_from_seed;
use crate::tower::Tower;

/// Result of a Tabu Search run.
#[derive(Debug, Clone)]
pub struct TabuResult<'a> {
    /// Tallest tower found.
    pub best: Tower<'a>,
    /// Height of the best tower.
    pub best_height: u64,
    /// Height of the greedy starting tower.
    pub initial_height: u64,
    /// Total iterations executed.
    pub iterations: usize,
    /// Iteration at which the best tower was found (0 if never improved).
    pub best_iteration: usize,
    /// Best height after each iteration.
    pub height_history: Vec<u64>,
}

/// Tabu Search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Executes Tabu Search over all blocks of `set`, taken as
    /// area-descending.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_stacking::{Block, BlockSet};
    /// use u_stacking::tabu::{TabuConfig, TabuRunner};
    ///
    /// let set = BlockSet::new(vec![
    ///     Block::new(1, 4, 4),
    ///     Block::new(2, 3, 3),
    ///     Block::new(3, 2, 2),
    /// ]);
    /// let result = TabuRunner::run(&set, &TabuConfig::default().with_seed(1));
    /// assert!(result.best.is_valid());
    /// assert!(result.best_height >= result.initial_height);
    /// ```
    ///
    /// # Panics
    /// Panics if the configuration is invalid.
    pub fn run<'a>(set: &'a BlockSet, config: &TabuConfig) -> TabuResult<'a> {
        let mut rng = rng_from_seed(config.seed);
        Self::run_with_rng(set, config, &mut rng)
    }

    /// Same as [`run`](Self::run) with a caller-supplied random source.
    ///
    /// The greedy seed in `config.greedy` is ignored; `rng` drives both
    /// phases.
    pub fn run_with_rng<'a, R: Rng>(
        set: &'a BlockSet,
        config: &TabuConfig,
        rng: &mut R,
    ) -> TabuResult<'a> {
        config.validate().expect("invalid TabuConfig");

        let initial = GreedyRunner::run_with_rng(set, &config.greedy, rng);
        let mut search = TabuSearch::new(set, initial.tower);
        let initial_height = search.best_height;

        let mut height_history = Vec::new();
        let mut no_improve_count = 0;
        let mut best_iteration = 0;

        while no_improve_count < config.max_no_improve {
            if config.max_iterations > 0 && height_history.len() >= config.max_iterations {
                break;
            }
            let iteration = height_history.len();

            match search.step(config, rng) {
                Some(mv) if search.improved => {
                    debug!(
                        "tabu iteration {iteration}: new best height {} (inserted {:?}, {} evicted)",
                        mv.height,
                        mv.block,
                        mv.orphans.len()
                    );
                    best_iteration = iteration;
                    no_improve_count = 0;
                }
                _ => no_improve_count += 1,
            }

            height_history.push(search.best_height);
        }

        debug!(
            "tabu: best height {} after {} iterations (greedy start {})",
            search.best_height,
            height_history.len(),
            initial_height
        );

        TabuResult {
            best: search.best,
            best_height: search.best_height,
            initial_height,
            iterations: height_history.len(),
            best_iteration,
            height_history,
        }
    }
}

/// Mutable search state threaded through the iterations.
struct TabuSearch<'a> {
    set: &'a BlockSet,
    current: Tower<'a>,
    best: Tower<'a>,
    best_height: u64,
    tabu: TabuList,
    improved: bool,
}

impl<'a> TabuSearch<'a> {
    fn new(set: &'a BlockSet, initial: Tower<'a>) -> Self {
        Self {
            set,
            best_height: initial.current_height(),
            best: initial.clone(),
            current: initial,
            tabu: TabuList::new(),
            improved: false,
        }
    }

    /// Performs one iteration. Returns the committed move, if any.
    fn step<R: Rng>(&mut self, config: &TabuConfig, rng: &mut R) -> Option<StackMove> {
        self.improved = false;

        let members: HashSet<BlockId> = self.current.blocks().iter().copied().collect();
        let candidates: Vec<BlockId> = self
            .set
            .ids()
            .filter(|id| members.contains(id) || !self.tabu.is_tabu(*id))
            .collect();

        let scored = score_moves(&self.current, &candidates, config.parallel);
        let committed = select_move(scored).and_then(|mv| {
            let displaced = self.current.insert_displacing(mv.block)?;
            Some(StackMove {
                block: mv.block,
                orphans: displaced.orphans,
                height: self.current.current_height(),
            })
        });

        if let Some(mv) = &committed {
            self.tabu.mark(mv.block, rng.random_range(config.tenure.clone()));
            for &orphan in &mv.orphans {
                self.tabu.mark(orphan, rng.random_range(config.tenure.clone()));
            }
            trace!(
                "tabu: committed {:?}, height {}, {} tabu",
                mv.block,
                mv.height,
                self.tabu.len()
            );
            if mv.height > self.best_height {
                self.best = self.current.clone();
                self.best_height = mv.height;
                self.improved = true;
            }
        }

        self.tabu.tick();
        committed
    }
}

/// Simulates a candidate's move on a private copy of the tower.
fn evaluate(tower: &Tower<'_>, id: BlockId) -> Option<StackMove> {
    let mut trial = tower.clone();
    let displaced = trial.insert_displacing(id)?;
    Some(StackMove {
        block: id,
        orphans: displaced.orphans,
        height: trial.current_height(),
    })
}

/// Scores every candidate, preserving candidate order.
fn score_moves(tower: &Tower<'_>, candidates: &[BlockId], parallel: bool) -> Vec<StackMove> {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            return candidates
                .par_iter()
                .filter_map(|&id| evaluate(tower, id))
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    candidates
        .iter()
        .filter_map(|&id| evaluate(tower, id))
        .collect()
}

/// Highest-scoring move; on ties the later one wins.
fn select_move(moves: Vec<StackMove>) -> Option<StackMove> {
    moves.into_iter().fold(None, |best, mv| match best {
        Some(b) if b.height > mv.height => Some(b),
        _ => Some(mv),
    })
}
