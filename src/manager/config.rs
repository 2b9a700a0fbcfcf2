//! Tower manager configuration.

/// Configuration for [`TowerManager`](super::TowerManager).
///
/// # Examples
///
/// ```
/// use u_stacking::manager::ManagerConfig;
///
/// let config = ManagerConfig::new(120)
///     .with_relocation_probability(0.8)
///     .with_max_no_improve(20)
///     .with_seed(5);
/// assert_eq!(config.height_limit, 120);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Height limit shared by every tower.
    pub height_limit: u64,
    /// Probability that a relocation scans all later towers for the first
    /// fit, rather than trying a single random later tower.
    pub relocation_probability: f64,
    /// Probability that [`pack`](super::TowerManager::pack) takes the head
    /// of the pool, rather than a random entry.
    pub insertion_probability: f64,
    /// Restack rounds without fewer towers before stopping.
    pub max_no_improve: usize,
    /// Log the full tower layout at `info` level whenever the count drops.
    pub log_updates: bool,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            height_limit: u64::MAX,
            relocation_probability: 0.6,
            insertion_probability: 0.95,
            max_no_improve: 100,
            log_updates: false,
            seed: None,
        }
    }
}

impl ManagerConfig {
    /// Default settings with the given height limit.
    pub fn new(height_limit: u64) -> Self {
        Self::default().with_height_limit(height_limit)
    }

    pub fn with_height_limit(mut self, limit: u64) -> Self {
        self.height_limit = limit;
        self
    }

    pub fn with_relocation_probability(mut self, p: f64) -> Self {
        self.relocation_probability = p;
        self
    }

    pub fn with_insertion_probability(mut self, p: f64) -> Self {
        self.insertion_probability = p;
        self
    }

    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    pub fn with_log_updates(mut self, log_updates: bool) -> Self {
        self.log_updates = log_updates;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.height_limit == 0 {
            return Err("height_limit must be positive".into());
        }
        for (name, p) in [
            ("relocation_probability", self.relocation_probability),
            ("insertion_probability", self.insertion_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("{name} must be in [0, 1], got {p}"));
            }
        }
        if self.max_no_improve == 0 {
            return Err("max_no_improve must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ManagerConfig::new(50);
        assert_eq!(config.height_limit, 50);
        assert!((config.relocation_probability - 0.6).abs() < 1e-12);
        assert!((config.insertion_probability - 0.95).abs() < 1e-12);
        assert_eq!(config.max_no_improve, 100);
        assert!(!config.log_updates);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(ManagerConfig::new(0).validate().is_err());
        assert!(ManagerConfig::new(10)
            .with_relocation_probability(-0.1)
            .validate()
            .is_err());
        assert!(ManagerConfig::new(10)
            .with_insertion_probability(1.1)
            .validate()
            .is_err());
        assert!(ManagerConfig::new(10)
            .with_max_no_improve(0)
            .validate()
            .is_err());
    }
}
