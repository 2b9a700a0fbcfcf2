//! Greedy construction configuration.

/// Configuration for greedy randomized construction.
///
/// # Examples
///
/// ```
/// use u_stacking::greedy::GreedyConfig;
///
/// let config = GreedyConfig::default()
///     .with_deterministic_probability(0.9)
///     .with_random_attempts(5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GreedyConfig {
    /// Probability of a first-fit round (versus a random-draw round).
    pub deterministic_probability: f64,
    /// Number of random draws attempted in a random round.
    pub random_attempts: usize,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            deterministic_probability: 0.95,
            random_attempts: 10,
            seed: None,
        }
    }
}

impl GreedyConfig {
    /// Sets the probability of a first-fit round.
    pub fn with_deterministic_probability(mut self, p: f64) -> Self {
        self.deterministic_probability = p;
        self
    }

    /// Sets the number of draws per random round.
    pub fn with_random_attempts(mut self, n: usize) -> Self {
        self.random_attempts = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// First-fit rounds are the only ones guaranteed to shrink the pool,
    /// so their probability must be strictly positive.
    pub fn validate(&self) -> Result<(), String> {
        let p = self.deterministic_probability;
        if !(p > 0.0 && p <= 1.0) {
            return Err(format!(
                "deterministic_probability must be in (0, 1], got {p}"
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GreedyConfig::default();
        assert!((config.deterministic_probability - 0.95).abs() < 1e-12);
        assert_eq!(config.random_attempts, 10);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_probability() {
        assert!(GreedyConfig::default()
            .with_deterministic_probability(0.0)
            .validate()
            .is_err());
        assert!(GreedyConfig::default()
            .with_deterministic_probability(1.5)
            .validate()
            .is_err());
        assert!(GreedyConfig::default()
            .with_deterministic_probability(1.0)
            .validate()
            .is_ok());
    }
}
