//! Monte Carlo path simulation engines.

pub mod mc_paths;
#[cfg(feature = "parallel")]
pub mod mc_parallel;

pub use mc_paths::{GbmPathSimulator, PathEnsemble, simulate_gbm_paths};
#[cfg(feature = "parallel")]
pub use mc_parallel::simulate_gbm_paths_parallel;
