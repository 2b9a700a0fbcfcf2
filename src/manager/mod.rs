//! Multi-tower packing under a shared height limit.
//!
//! [`TowerManager`] assigns blocks to towers first-fit, relocates blocks
//! towards later towers to empty earlier ones, and runs a restacking loop
//! that repeatedly releases every block in a different order and packs them
//! again, keeping the arrangement with the fewest towers.

mod config;
mod towers;

pub use config::ManagerConfig;
pub use towers::{PackResult, Release, TowerManager};
