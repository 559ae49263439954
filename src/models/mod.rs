//! Stochastic process models used by the simulation engines.

use serde::{Deserialize, Serialize};

/// Geometric Brownian motion `dS = mu * S dt + sigma * S dW`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gbm {
    pub mu: f64,
    pub sigma: f64,
}

impl Gbm {
    /// Log-space drift and diffusion of one exact step of length `dt`.
    ///
    /// A step is `s * exp(drift + diffusion * z)` with `z ~ N(0, 1)`.
    #[inline]
    pub fn step_coefficients(&self, dt: f64) -> (f64, f64) {
        (
            (self.mu - 0.5 * self.sigma * self.sigma) * dt,
            self.sigma * dt.sqrt(),
        )
    }

    /// `E[S_t] = s0 * exp(mu * t)`.
    #[inline]
    pub fn expected_spot(&self, s0: f64, t: f64) -> f64 {
        s0 * (self.mu * t).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn step_drift_carries_the_ito_correction() {
        let (drift, diffusion) = Gbm { mu: 0.07, sigma: 0.2 }.step_coefficients(0.5);
        assert_relative_eq!(drift, (0.07 - 0.02) * 0.5, epsilon = 1e-15);
        assert_relative_eq!(diffusion, 0.2 * 0.5_f64.sqrt(), epsilon = 1e-15);
    }

    #[test]
    fn zero_vol_step_is_deterministic_growth() {
        let gbm = Gbm { mu: 0.05, sigma: 0.0 };
        let (drift, diffusion) = gbm.step_coefficients(1.0);
        assert_eq!(diffusion, 0.0);
        assert_relative_eq!(100.0 * drift.exp(), gbm.expected_spot(100.0, 1.0), epsilon = 1e-12);
    }
}
