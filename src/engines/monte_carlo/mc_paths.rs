//! Module `engines::monte_carlo::mc_paths`.
//!
//! Simulates ensembles of geometric-Brownian-motion price paths.
//!
//! References: Glasserman (2004) Sec. 3.1 for the exact lognormal scheme; Hull (11th ed.) Ch. 21.
//!
//! Key types and purpose: [`PathEnsemble`] stores the full `n_steps x n_simulations` matrix so callers
//! can reduce it however they like; [`GbmPathSimulator`] owns the counts and a seed.
//!
//! Numerical considerations: every step uses the exact transition
//! `S_t = S_{t-1} * exp((mu - sigma^2 / 2) dt + sigma sqrt(dt) Z)`, so paths stay strictly positive
//! and there is no time-discretization bias. The ensemble has `n_steps` rows with row 0 pinned to `S0`,
//! so the last row sits at `(n_steps - 1) * dt`, not at `T`.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::core::PricingError;
use crate::models::Gbm;

/// Simulated spot prices indexed by `[time step, simulation]`, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEnsemble {
    n_steps: usize,
    n_simulations: usize,
    prices: Vec<f64>,
}

impl PathEnsemble {
    /// Wraps a row-major buffer.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidArgument`] when either dimension is zero or the
    /// buffer length is not `n_steps * n_simulations`.
    pub fn from_row_major(
        n_steps: usize,
        n_simulations: usize,
        prices: Vec<f64>,
    ) -> Result<Self, PricingError> {
        if n_steps == 0 || n_simulations == 0 {
            return Err(PricingError::InvalidArgument(
                "path ensemble dimensions must be > 0".to_string(),
            ));
        }
        let cells = cell_count(n_steps, n_simulations)?;
        if prices.len() != cells {
            return Err(PricingError::InvalidArgument(format!(
                "expected {cells} prices for a {n_steps}x{n_simulations} ensemble, got {}",
                prices.len()
            )));
        }
        Ok(Self {
            n_steps,
            n_simulations,
            prices,
        })
    }

    /// Number of time rows.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Number of simulated paths (columns).
    #[inline]
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// `(n_steps, n_simulations)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_steps, self.n_simulations)
    }

    /// Price at `(step, simulation)`, or `None` out of bounds.
    #[inline]
    pub fn get(&self, step: usize, simulation: usize) -> Option<f64> {
        if step >= self.n_steps || simulation >= self.n_simulations {
            return None;
        }
        Some(self.prices[step * self.n_simulations + simulation])
    }

    /// All simulations at one time step, or `None` out of bounds.
    #[inline]
    pub fn row(&self, step: usize) -> Option<&[f64]> {
        if step >= self.n_steps {
            return None;
        }
        let start = step * self.n_simulations;
        Some(&self.prices[start..start + self.n_simulations])
    }

    /// Iterates rows from step 0 to the last step.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.prices.chunks_exact(self.n_simulations)
    }

    /// The last simulated row.
    #[inline]
    pub fn final_prices(&self) -> &[f64] {
        let start = (self.n_steps - 1) * self.n_simulations;
        &self.prices[start..]
    }

    /// One simulated path across all time steps, or `None` out of bounds.
    pub fn path(&self, simulation: usize) -> Option<Vec<f64>> {
        if simulation >= self.n_simulations {
            return None;
        }
        Some(self.rows().map(|row| row[simulation]).collect())
    }

    /// Row-major backing buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }

    /// Mean of the final row.
    pub fn mean_final_price(&self) -> f64 {
        let finals = self.final_prices();
        finals.iter().sum::<f64>() / finals.len() as f64
    }

    /// Population standard deviation of the final row.
    pub fn std_final_price(&self) -> f64 {
        let finals = self.final_prices();
        let mean = self.mean_final_price();
        let var = finals.iter().map(|&s| (s - mean) * (s - mean)).sum::<f64>() / finals.len() as f64;
        var.sqrt()
    }

    /// Standard error of [`Self::mean_final_price`] using the unbiased sample variance.
    pub fn standard_error_final(&self) -> f64 {
        let n = self.n_simulations;
        if n < 2 {
            return 0.0;
        }
        let finals = self.final_prices();
        let mean = self.mean_final_price();
        let var = finals.iter().map(|&s| (s - mean) * (s - mean)).sum::<f64>() / (n - 1) as f64;
        (var / n as f64).sqrt()
    }
}

fn cell_count(n_steps: usize, n_simulations: usize) -> Result<usize, PricingError> {
    n_steps.checked_mul(n_simulations).ok_or_else(|| {
        PricingError::InvalidArgument(format!(
            "a {n_steps}x{n_simulations} ensemble does not fit in memory"
        ))
    })
}

/// Checks simulation inputs and returns the ensemble size `n_steps * n_simulations`.
pub(crate) fn validate_inputs(
    s0: f64,
    mu: f64,
    sigma: f64,
    expiry: f64,
    n_simulations: usize,
    n_steps: usize,
) -> Result<usize, PricingError> {
    if n_simulations == 0 {
        return Err(PricingError::InvalidArgument(
            "n_simulations must be > 0".to_string(),
        ));
    }
    if n_steps == 0 {
        return Err(PricingError::InvalidArgument(
            "n_steps must be > 0".to_string(),
        ));
    }
    if !s0.is_finite() || s0 <= 0.0 {
        return Err(PricingError::InvalidArgument(
            "initial spot must be finite and > 0".to_string(),
        ));
    }
    if !expiry.is_finite() || expiry <= 0.0 {
        return Err(PricingError::InvalidArgument(
            "horizon must be finite and > 0".to_string(),
        ));
    }
    if !mu.is_finite() || !sigma.is_finite() || sigma < 0.0 {
        return Err(PricingError::InvalidArgument(
            "drift must be finite and vol must be finite and >= 0".to_string(),
        ));
    }
    cell_count(n_steps, n_simulations)
}

/// Simulates `n_simulations` GBM paths over `expiry` years using the caller's generator.
///
/// Row 0 is `s0` in every column; row `t` is row `t - 1` times an exact lognormal step.
/// The generator is consumed row by row, `n_simulations` normals per row.
///
/// # Errors
/// Returns [`PricingError::InvalidArgument`] for zero counts, non-positive `s0` or `expiry`,
/// negative `sigma`, or non-finite inputs.
///
/// # Examples
/// ```
/// use optpricer::engines::monte_carlo::simulate_gbm_paths;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let paths = simulate_gbm_paths(100.0, 0.07, 0.2, 1.0, 500, 252, &mut rng).unwrap();
/// assert_eq!(paths.shape(), (252, 500));
/// assert!(paths.row(0).unwrap().iter().all(|&s| s == 100.0));
/// ```
pub fn simulate_gbm_paths<R: Rng + ?Sized>(
    s0: f64,
    mu: f64,
    sigma: f64,
    expiry: f64,
    n_simulations: usize,
    n_steps: usize,
    rng: &mut R,
) -> Result<PathEnsemble, PricingError> {
    let cells = validate_inputs(s0, mu, sigma, expiry, n_simulations, n_steps)?;

    let dt = expiry / n_steps as f64;
    let (drift, diffusion) = Gbm { mu, sigma }.step_coefficients(dt);

    let mut prices = vec![s0; cells];
    for t in 1..n_steps {
        let (done, rest) = prices.split_at_mut(t * n_simulations);
        let prev = &done[(t - 1) * n_simulations..];
        let curr = &mut rest[..n_simulations];
        for (s, &s_prev) in curr.iter_mut().zip(prev) {
            let z: f64 = StandardNormal.sample(&mut *rng);
            *s = s_prev * (drift + diffusion * z).exp();
        }
    }

    PathEnsemble::from_row_major(n_steps, n_simulations, prices)
}

/// GBM path simulator with fixed counts and seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GbmPathSimulator {
    /// Number of simulated paths.
    pub num_simulations: usize,
    /// Number of time rows per path.
    pub num_steps: usize,
    /// RNG seed.
    pub seed: u64,
}

impl GbmPathSimulator {
    /// Creates a simulator with explicit path and time-step counts.
    pub fn new(num_simulations: usize, num_steps: usize, seed: u64) -> Self {
        Self {
            num_simulations,
            num_steps,
            seed,
        }
    }

    /// Runs one simulation with a fresh `StdRng` seeded from `self.seed`.
    ///
    /// Repeated calls return identical ensembles.
    pub fn simulate(
        &self,
        s0: f64,
        mu: f64,
        sigma: f64,
        expiry: f64,
    ) -> Result<PathEnsemble, PricingError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        simulate_gbm_paths(
            s0,
            mu,
            sigma,
            expiry,
            self.num_simulations,
            self.num_steps,
            &mut rng,
        )
    }
}

impl Default for GbmPathSimulator {
    fn default() -> Self {
        Self::new(1_000, 252, 42)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_row_is_pinned_to_spot_and_paths_stay_positive() {
        let paths = GbmPathSimulator::new(200, 50, 11)
            .simulate(100.0, 0.07, 0.4, 1.0)
            .unwrap();
        assert_eq!(paths.shape(), (50, 200));
        assert!(paths.row(0).unwrap().iter().all(|&s| s == 100.0));
        assert!(paths.as_slice().iter().all(|&s| s > 0.0 && s.is_finite()));
    }

    #[test]
    fn same_seed_reproduces_the_ensemble() {
        let sim = GbmPathSimulator::new(64, 30, 2024);
        let a = sim.simulate(50.0, 0.03, 0.25, 2.0).unwrap();
        let b = sim.simulate(50.0, 0.03, 0.25, 2.0).unwrap();
        assert_eq!(a, b);

        let c = GbmPathSimulator::new(64, 30, 2025)
            .simulate(50.0, 0.03, 0.25, 2.0)
            .unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn zero_vol_paths_grow_deterministically() {
        let paths = GbmPathSimulator::new(5, 11, 1)
            .simulate(100.0, 0.05, 0.0, 1.0)
            .unwrap();
        let dt = 1.0 / 11.0;
        for t in 0..11 {
            let expected = 100.0 * (0.05 * dt * t as f64).exp();
            for &s in paths.row(t).unwrap() {
                assert_relative_eq!(s, expected, max_relative = 1e-12);
            }
        }
        assert_relative_eq!(paths.std_final_price(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn each_step_depends_only_on_the_previous_row() {
        // Replaying the generator reconstructs every row from the one before it.
        let (s0, mu, sigma, expiry, n_sims, n_steps) = (80.0, 0.02, 0.3, 0.5, 8, 6);
        let mut rng = StdRng::seed_from_u64(99);
        let paths = simulate_gbm_paths(s0, mu, sigma, expiry, n_sims, n_steps, &mut rng).unwrap();

        let (drift, diffusion) = Gbm { mu, sigma }.step_coefficients(expiry / n_steps as f64);
        let mut replay = StdRng::seed_from_u64(99);
        for t in 1..n_steps {
            for k in 0..n_sims {
                let z: f64 = StandardNormal.sample(&mut replay);
                let expected = paths.get(t - 1, k).unwrap() * (drift + diffusion * z).exp();
                assert_relative_eq!(paths.get(t, k).unwrap(), expected, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn single_step_ensemble_is_just_the_spot_row() {
        let paths = GbmPathSimulator::new(3, 1, 5)
            .simulate(42.0, 0.1, 0.3, 1.0)
            .unwrap();
        assert_eq!(paths.final_prices(), &[42.0, 42.0, 42.0]);
        assert_eq!(paths.standard_error_final(), 0.0);
    }

    #[test]
    fn accessors_agree_with_row_major_layout() {
        let paths = PathEnsemble::from_row_major(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(paths.get(1, 0), Some(4.0));
        assert_eq!(paths.get(2, 0), None);
        assert_eq!(paths.row(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(paths.path(2), Some(vec![3.0, 6.0]));
        assert_eq!(paths.path(3), None);
        assert_relative_eq!(paths.mean_final_price(), 5.0, epsilon = 1e-15);
        assert_relative_eq!(paths.std_final_price(), (2.0_f64 / 3.0).sqrt(), epsilon = 1e-15);
        assert_relative_eq!(paths.standard_error_final(), (1.0_f64 / 3.0).sqrt(), epsilon = 1e-15);
        assert!(PathEnsemble::from_row_major(2, 2, vec![1.0; 3]).is_err());
        let oversized = PathEnsemble::from_row_major(usize::MAX, 2, Vec::new());
        assert!(matches!(oversized, Err(PricingError::InvalidArgument(_))));
    }

    #[test]
    fn zero_counts_are_invalid_arguments() {
        let mut rng = StdRng::seed_from_u64(0);
        let no_sims = simulate_gbm_paths(100.0, 0.07, 0.2, 1.0, 0, 252, &mut rng);
        let no_steps = simulate_gbm_paths(100.0, 0.07, 0.2, 1.0, 100, 0, &mut rng);
        let bad_spot = simulate_gbm_paths(-1.0, 0.07, 0.2, 1.0, 100, 10, &mut rng);
        assert!(matches!(no_sims, Err(PricingError::InvalidArgument(_))));
        assert!(matches!(no_steps, Err(PricingError::InvalidArgument(_))));
        assert!(matches!(bad_spot, Err(PricingError::InvalidArgument(_))));
    }
}
