//! Module `engines::monte_carlo::mc_parallel`.
//!
//! Rayon-parallel GBM ensemble generation (feature `parallel`).
//!
//! Every simulation column owns a `StdRng` seeded from `(seed, column)`, so the ensemble depends only
//! on the seed and the counts, never on the thread count or the scheduling order. The normals consumed
//! differ from [`super::simulate_gbm_paths`], so the two functions give different (equally distributed)
//! ensembles for the same seed.
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};
use rayon::prelude::*;

use super::mc_paths::{PathEnsemble, validate_inputs};
use crate::core::PricingError;
use crate::models::Gbm;

/// Decorrelated per-column seed (SplitMix64 finalizer over a Weyl sequence).
#[inline]
pub fn stream_seed(base_seed: u64, stream_index: usize) -> u64 {
    let mut z = base_seed.wrapping_add((stream_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Parallel counterpart of [`super::simulate_gbm_paths`] driven by a seed.
///
/// # Errors
/// Same validation as [`super::simulate_gbm_paths`].
pub fn simulate_gbm_paths_parallel(
    s0: f64,
    mu: f64,
    sigma: f64,
    expiry: f64,
    n_simulations: usize,
    n_steps: usize,
    seed: u64,
) -> Result<PathEnsemble, PricingError> {
    let cells = validate_inputs(s0, mu, sigma, expiry, n_simulations, n_steps)?;

    let dt = expiry / n_steps as f64;
    let (drift, diffusion) = Gbm { mu, sigma }.step_coefficients(dt);

    let columns: Vec<Vec<f64>> = (0..n_simulations)
        .into_par_iter()
        .map(|k| {
            let mut rng = StdRng::seed_from_u64(stream_seed(seed, k));
            let mut column = Vec::with_capacity(n_steps);
            let mut s = s0;
            column.push(s);
            for _ in 1..n_steps {
                let z: f64 = StandardNormal.sample(&mut rng);
                s *= (drift + diffusion * z).exp();
                column.push(s);
            }
            column
        })
        .collect();

    let mut prices = vec![0.0_f64; cells];
    for (k, column) in columns.iter().enumerate() {
        for (t, &s) in column.iter().enumerate() {
            prices[t * n_simulations + k] = s;
        }
    }

    PathEnsemble::from_row_major(n_steps, n_simulations, prices)
}
