//! Tabu Search configuration.

use std::ops::RangeInclusive;

use crate::greedy::GreedyConfig;

/// Configuration parameters for Tabu Search.
///
/// # Examples
///
/// ```
/// use u_stacking::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_tenure(3..=5)
///     .with_max_no_improve(50)
///     .with_seed(7);
/// assert_eq!(config.max_no_improve, 50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct TabuConfig {
    /// Range the cooldown of a moved block is drawn from, inclusive.
    pub tenure: RangeInclusive<u32>,
    /// Iterations without a new best height before stopping.
    pub max_no_improve: usize,
    /// Hard iteration cap (0 = no limit).
    pub max_iterations: usize,
    /// Settings of the greedy construction seeding the search.
    pub greedy: GreedyConfig,
    /// Whether to score candidate moves in parallel using rayon.
    ///
    /// Has no effect unless the `parallel` feature is enabled.
    pub parallel: bool,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            tenure: 7..=10,
            max_no_improve: 100,
            max_iterations: 0,
            greedy: GreedyConfig::default(),
            parallel: false,
            seed: None,
        }
    }
}

impl TabuConfig {
    /// Sets the cooldown range.
    pub fn with_tenure(mut self, tenure: RangeInclusive<u32>) -> Self {
        self.tenure = tenure;
        self
    }

    /// Sets maximum iterations without improvement.
    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    /// Sets the hard iteration cap.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the greedy construction settings.
    pub fn with_greedy(mut self, greedy: GreedyConfig) -> Self {
        self.greedy = greedy;
        self
    }

    /// Enables or disables parallel move scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if *self.tenure.start() == 0 {
            return Err("tenure must start at 1 or more".into());
        }
        if self.tenure.is_empty() {
            return Err(format!(
                "tenure range is empty: {}..={}",
                self.tenure.start(),
                self.tenure.end()
            ));
        }
        if self.max_no_improve == 0 {
            return Err("max_no_improve must be positive".into());
        }
        self.greedy.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabu_config_defaults() {
        let config = TabuConfig::default();
        assert_eq!(config.tenure, 7..=10);
        assert_eq!(config.max_no_improve, 100);
        assert_eq!(config.max_iterations, 0);
        assert!(!config.parallel);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tabu_config_builder() {
        let config = TabuConfig::default()
            .with_tenure(2..=3)
            .with_max_no_improve(10)
            .with_max_iterations(500)
            .with_parallel(true)
            .with_seed(123);

        assert_eq!(config.tenure, 2..=3);
        assert_eq!(config.max_no_improve, 10);
        assert_eq!(config.max_iterations, 500);
        assert!(config.parallel);
        assert_eq!(config.seed, Some(123));
    }

    #[test]
    fn test_tabu_config_rejects_bad_tenure() {
        assert!(TabuConfig::default().with_tenure(0..=3).validate().is_err());
        #[allow(clippy::reversed_empty_ranges)]
        let empty = 5..=4;
        assert!(TabuConfig::default().with_tenure(empty).validate().is_err());
    }

    #[test]
    fn test_tabu_config_rejects_zero_stagnation() {
        assert!(TabuConfig::default()
            .with_max_no_improve(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_tabu_config_checks_greedy() {
        let greedy = GreedyConfig::default().with_deterministic_probability(2.0);
        assert!(TabuConfig::default().with_greedy(greedy).validate().is_err());
    }
}
