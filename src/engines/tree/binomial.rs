//! Module `engines::tree::binomial`.
//!
//! Cox-Ross-Rubinstein recombining lattice for European vanilla options.
//!
//! References: Hull (11th ed.) Ch. 13, Cox-Ross-Rubinstein (1979), and backward-induction recursions around Eq. (13.10).
//!
//! Key types and purpose: [`CrrLattice`] holds the per-step parameters `(dt, u, d, p)` and the node-price
//! formula `S * u^j * d^(i - j)`, evaluated in log space; [`BinomialTreeEngine`] runs backward induction
//! on top of it.
//!
//! Numerical considerations: convergence to Black-Scholes is first order in the step count and oscillates
//! with the parity of `N`. When `exp(r * dt)` falls outside `[d, u]` the risk-neutral probability leaves
//! `[0, 1]`; the lattice refuses to build rather than clamp.
use crate::core::{DiagKey, Diagnostics, OptionType, PricingEngine, PricingError, PricingResult};
use crate::instruments::vanilla::VanillaOption;
use crate::market::Market;

/// Per-step parameters of a CRR lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrrLattice {
    /// Number of time steps `N`.
    pub steps: usize,
    /// Step length `T / N` in years.
    pub dt: f64,
    /// Up factor `exp(sigma * sqrt(dt))`.
    pub u: f64,
    /// Down factor `1 / u`.
    pub d: f64,
    /// Risk-neutral probability of an up move.
    pub p: f64,
    /// One-step discount factor `exp(-r * dt)`.
    pub discount: f64,
}

impl CrrLattice {
    /// Builds the lattice parameters for `steps` periods over `expiry` years.
    ///
    /// # Errors
    /// - [`PricingError::InvalidArgument`] when `steps == 0`, or when rate/vol/expiry are
    ///   non-finite or negative (rate may be negative).
    /// - [`PricingError::NumericDomain`] when the risk-neutral probability is not a finite
    ///   number in `[0, 1]`; this covers `vol == 0` and `expiry == 0`, where `u == d`.
    ///
    /// # Examples
    /// ```
    /// use optpricer::engines::tree::CrrLattice;
    ///
    /// let lattice = CrrLattice::new(0.05, 0.2, 1.0, 4).unwrap();
    /// assert!((lattice.u * lattice.d - 1.0).abs() < 1e-15);
    /// assert_eq!(lattice.node_price(100.0, 2, 1), Some(100.0));
    /// ```
    pub fn new(rate: f64, vol: f64, expiry: f64, steps: usize) -> Result<Self, PricingError> {
        if steps == 0 {
            return Err(PricingError::InvalidArgument(
                "binomial steps must be > 0".to_string(),
            ));
        }
        if !rate.is_finite() || !vol.is_finite() || !expiry.is_finite() {
            return Err(PricingError::InvalidArgument(
                "rate, vol and expiry must be finite".to_string(),
            ));
        }
        if vol < 0.0 || expiry < 0.0 {
            return Err(PricingError::InvalidArgument(
                "vol and expiry must be >= 0".to_string(),
            ));
        }

        let dt = expiry / steps as f64;
        let u = (vol * dt.sqrt()).exp();
        let d = 1.0 / u;
        let p = ((rate * dt).exp() - d) / (u - d);
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(PricingError::NumericDomain(format!(
                "risk-neutral probability {p} is outside [0, 1] for dt={dt}, vol={vol}, rate={rate}"
            )));
        }

        Ok(Self {
            steps,
            dt,
            u,
            d,
            p,
            discount: (-rate * dt).exp(),
        })
    }

    /// Stock price at node `(step, up_moves)`: `spot * u^up_moves * d^(step - up_moves)`.
    ///
    /// Evaluated as `spot * exp((2 * up_moves - step) * ln u)`, so node `(2k, k)` is exactly
    /// `spot`. Returns `None` when `up_moves > step`.
    #[inline]
    pub fn node_price(&self, spot: f64, step: usize, up_moves: usize) -> Option<f64> {
        (up_moves <= step).then(|| self.log_node_price(spot, step, up_moves))
    }

    #[inline]
    fn log_node_price(&self, spot: f64, step: usize, up_moves: usize) -> f64 {
        let net_up = 2.0 * up_moves as f64 - step as f64;
        spot * (net_up * self.u.ln()).exp()
    }

    /// All `step + 1` stock prices at a time slice, ordered by increasing up-move count.
    ///
    /// Extreme nodes of very wide lattices saturate to `0` or `inf`.
    pub fn stock_prices_at(&self, spot: f64, step: usize) -> Vec<f64> {
        (0..=step)
            .map(|j| self.log_node_price(spot, step, j))
            .collect()
    }

    /// Discounted expectation of the terminal payoff by backward induction.
    ///
    /// Only the put is rolled back: its payoff is bounded by the strike, so saturated nodes
    /// stay harmless. The call follows from parity, which holds exactly on the lattice
    /// because `p * u + (1 - p) * d = exp(r * dt)`. Two `N + 1` buffers are swapped after
    /// every step, so memory stays fixed at `O(N)`.
    ///
    /// # Errors
    /// Returns [`PricingError::NumericDomain`] when the rollback does not produce a finite price.
    pub fn backward_induction(
        &self,
        option_type: OptionType,
        spot: f64,
        strike: f64,
    ) -> Result<f64, PricingError> {
        let n = self.steps;
        let disc_p = self.discount * self.p;
        let disc_1mp = self.discount * (1.0 - self.p);

        let mut current = self.stock_prices_at(spot, n);
        for value in current.iter_mut() {
            *value = OptionType::Put.intrinsic(*value, strike);
        }
        let mut next = vec![0.0_f64; n + 1];

        for i in (0..n).rev() {
            for j in 0..=i {
                next[j] = disc_p.mul_add(current[j + 1], disc_1mp * current[j]);
            }
            std::mem::swap(&mut current, &mut next);
        }

        let put = current[0];
        let price = match option_type {
            OptionType::Put => put,
            OptionType::Call => {
                let discount_n = (self.discount.ln() * n as f64).exp();
                put + spot - strike * discount_n
            }
        };
        if !price.is_finite() {
            return Err(PricingError::NumericDomain(format!(
                "lattice rollback produced {price} with {n} steps and u={}",
                self.u
            )));
        }
        Ok(price.max(0.0))
    }
}

/// Cox-Ross-Rubinstein binomial tree engine.
#[derive(Debug, Clone)]
pub struct BinomialTreeEngine {
    /// Number of tree steps.
    pub steps: usize,
}

impl BinomialTreeEngine {
    /// Creates a tree engine with the given number of steps.
    pub fn new(steps: usize) -> Self {
        Self { steps }
    }
}

impl Default for BinomialTreeEngine {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PricingEngine<VanillaOption> for BinomialTreeEngine {
    fn price(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<PricingResult, PricingError> {
        instrument.validate()?;
        if !market.spot.is_finite() || market.spot <= 0.0 {
            return Err(PricingError::InvalidArgument(
                "spot must be finite and > 0".to_string(),
            ));
        }

        let lattice = CrrLattice::new(market.rate, market.vol, instrument.expiry, self.steps)?;
        let price =
            lattice.backward_induction(instrument.option_type, market.spot, instrument.strike)?;

        let mut diagnostics = Diagnostics::new();
        diagnostics.insert_key(DiagKey::NumSteps, self.steps as f64);
        diagnostics.insert_key(DiagKey::Vol, market.vol);
        diagnostics.insert_key(DiagKey::Up, lattice.u);
        diagnostics.insert_key(DiagKey::Down, lattice.d);
        diagnostics.insert_key(DiagKey::Pu, lattice.p);
        diagnostics.insert_key(DiagKey::DiscountFactor, lattice.discount);

        Ok(PricingResult { price, diagnostics })
    }
}

/// One-liner CRR binomial price of a European option.
///
/// # Errors
/// Same as [`CrrLattice::new`], plus [`PricingError::InvalidArgument`] for non-positive
/// spot or strike.
///
/// # Examples
/// ```
/// use optpricer::core::OptionType;
/// use optpricer::engines::tree::binomial_tree;
///
/// let call = binomial_tree(OptionType::Call, 100.0, 100.0, 0.05, 0.2, 1.0, 100).unwrap();
/// assert!((call - 10.45).abs() < 0.5);
/// ```
pub fn binomial_tree(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
    steps: usize,
) -> Result<f64, PricingError> {
    let market = Market::builder().spot(spot).rate(rate).flat_vol(vol).build()?;
    let instrument = VanillaOption {
        option_type,
        strike,
        expiry,
    };
    Ok(BinomialTreeEngine::new(steps)
        .price(&instrument, &market)?
        .price)
}
