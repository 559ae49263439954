//! Closed registry of the pricing models exposed to front ends.
//!
//! Front ends pick a model by its display name ([`resolve`]) and then build the matching
//! [`ModelRequest`] variant. Each variant carries its own parameter struct: Black-Scholes and the
//! binomial tree return a price, Monte Carlo returns a [`PathEnsemble`]. The signatures are not
//! normalized, so a caller has to know which model it is talking to.
//!
//! # Examples
//! ```
//! use optpricer::registry::{BinomialTreeParams, ModelRequest, resolve, Model};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let model = resolve("Binomial Tree").unwrap();
//! assert_eq!(model, Model::BinomialTree);
//!
//! let request = ModelRequest::BinomialTree(BinomialTreeParams { steps: 200, ..Default::default() });
//! let output = request.evaluate(&mut StdRng::seed_from_u64(0)).unwrap();
//! assert!((output.price().unwrap() - 10.45).abs() < 0.1);
//! ```

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::core::{OptionType, PricingError};
use crate::engines::analytic::black_scholes;
use crate::engines::monte_carlo::{PathEnsemble, simulate_gbm_paths};
use crate::engines::tree::binomial_tree;
use crate::models::Gbm;

/// The fixed set of pricing models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "Black-Scholes")]
    BlackScholes,
    #[serde(rename = "Binomial Tree")]
    BinomialTree,
    #[serde(rename = "Monte Carlo")]
    MonteCarlo,
}

impl Model {
    /// Every registered model, in menu order.
    pub const ALL: [Self; 3] = [Self::BlackScholes, Self::BinomialTree, Self::MonteCarlo];

    /// Display name used for lookup.
    pub fn name(self) -> &'static str {
        match self {
            Self::BlackScholes => "Black-Scholes",
            Self::BinomialTree => "Binomial Tree",
            Self::MonteCarlo => "Monte Carlo",
        }
    }

    /// The model's pricing function with its own parameter list.
    pub fn function(self) -> ModelFn {
        match self {
            Self::BlackScholes => ModelFn::BlackScholes(black_scholes),
            Self::BinomialTree => ModelFn::BinomialTree(binomial_tree),
            Self::MonteCarlo => ModelFn::MonteCarlo(simulate_gbm_paths::<StdRng>),
        }
    }

    /// A request populated with this model's default parameters.
    pub fn default_request(self) -> ModelRequest {
        match self {
            Self::BlackScholes => ModelRequest::BlackScholes(BlackScholesParams::default()),
            Self::BinomialTree => ModelRequest::BinomialTree(BinomialTreeParams::default()),
            Self::MonteCarlo => ModelRequest::MonteCarlo(MonteCarloParams::default()),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Model {
    type Err = PricingError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|model| model.name() == name)
            .ok_or_else(|| PricingError::NotFound(format!("no pricing model named `{name}`")))
    }
}

/// Looks up a model by its exact display name.
///
/// # Errors
/// Returns [`PricingError::NotFound`] for any name outside [`Model::ALL`].
pub fn resolve(name: &str) -> Result<Model, PricingError> {
    name.parse()
}

/// Black-Scholes signature: `(option_type, spot, strike, rate, vol, expiry)`.
pub type BlackScholesFn = fn(OptionType, f64, f64, f64, f64, f64) -> Result<f64, PricingError>;
/// Binomial signature: `(option_type, spot, strike, rate, vol, expiry, steps)`.
pub type BinomialTreeFn =
    fn(OptionType, f64, f64, f64, f64, f64, usize) -> Result<f64, PricingError>;
/// Monte Carlo signature: `(s0, mu, sigma, expiry, n_simulations, n_steps, rng)`.
pub type MonteCarloFn =
    fn(f64, f64, f64, f64, usize, usize, &mut StdRng) -> Result<PathEnsemble, PricingError>;

/// A resolved pricing function, tagged by model.
#[derive(Clone, Copy)]
pub enum ModelFn {
    BlackScholes(BlackScholesFn),
    BinomialTree(BinomialTreeFn),
    MonteCarlo(MonteCarloFn),
}

/// Inputs of the closed-form model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlackScholesParams {
    pub spot: f64,
    pub strike: f64,
    pub expiry: f64,
    pub rate: f64,
    pub vol: f64,
    pub option_type: OptionType,
}

impl Default for BlackScholesParams {
    fn default() -> Self {
        Self {
            spot: 100.0,
            strike: 100.0,
            expiry: 1.0,
            rate: 0.05,
            vol: 0.2,
            option_type: OptionType::Call,
        }
    }
}

impl BlackScholesParams {
    pub fn price(&self) -> Result<f64, PricingError> {
        black_scholes(
            self.option_type,
            self.spot,
            self.strike,
            self.rate,
            self.vol,
            self.expiry,
        )
    }
}

/// Inputs of the CRR lattice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinomialTreeParams {
    pub spot: f64,
    pub strike: f64,
    pub expiry: f64,
    pub rate: f64,
    pub vol: f64,
    pub option_type: OptionType,
    /// Number of lattice steps `N`.
    pub steps: usize,
}

impl Default for BinomialTreeParams {
    fn default() -> Self {
        Self {
            spot: 100.0,
            strike: 100.0,
            expiry: 1.0,
            rate: 0.05,
            vol: 0.2,
            option_type: OptionType::Call,
            steps: 100,
        }
    }
}

impl BinomialTreeParams {
    pub fn price(&self) -> Result<f64, PricingError> {
        binomial_tree(
            self.option_type,
            self.spot,
            self.strike,
            self.rate,
            self.vol,
            self.expiry,
            self.steps,
        )
    }
}

/// Inputs of the GBM path simulation. There is no strike or option side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloParams {
    pub spot: f64,
    /// Real-world drift `mu`.
    pub mu: f64,
    pub vol: f64,
    pub expiry: f64,
    pub n_simulations: usize,
    pub n_steps: usize,
}

impl Default for MonteCarloParams {
    fn default() -> Self {
        Self {
            spot: 100.0,
            mu: 0.07,
            vol: 0.2,
            expiry: 1.0,
            n_simulations: 1_000,
            n_steps: 252,
        }
    }
}

impl MonteCarloParams {
    /// Mean of the last row, `spot * exp(mu * (n_steps - 1) * dt)`.
    pub fn expected_final_price(&self) -> f64 {
        let dt = self.expiry / self.n_steps as f64;
        let last_row_time = dt * self.n_steps.saturating_sub(1) as f64;
        Gbm {
            mu: self.mu,
            sigma: self.vol,
        }
        .expected_spot(self.spot, last_row_time)
    }

    pub fn simulate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PathEnsemble, PricingError> {
        simulate_gbm_paths(
            self.spot,
            self.mu,
            self.vol,
            self.expiry,
            self.n_simulations,
            self.n_steps,
            rng,
        )
    }
}

/// A model selection together with the parameters that model needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum ModelRequest {
    #[serde(rename = "Black-Scholes")]
    BlackScholes(BlackScholesParams),
    #[serde(rename = "Binomial Tree")]
    BinomialTree(BinomialTreeParams),
    #[serde(rename = "Monte Carlo")]
    MonteCarlo(MonteCarloParams),
}

impl ModelRequest {
    /// Model this request targets.
    pub fn model(&self) -> Model {
        match self {
            Self::BlackScholes(_) => Model::BlackScholes,
            Self::BinomialTree(_) => Model::BinomialTree,
            Self::MonteCarlo(_) => Model::MonteCarlo,
        }
    }

    /// Same request with the option side replaced; Monte Carlo requests are returned unchanged.
    pub fn with_option_type(self, option_type: OptionType) -> Self {
        match self {
            Self::BlackScholes(params) => Self::BlackScholes(BlackScholesParams {
                option_type,
                ..params
            }),
            Self::BinomialTree(params) => Self::BinomialTree(BinomialTreeParams {
                option_type,
                ..params
            }),
            Self::MonteCarlo(params) => Self::MonteCarlo(params),
        }
    }

    /// Runs the request. Only Monte Carlo draws from `rng`.
    pub fn evaluate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ModelOutput, PricingError> {
        let _span = tracing::debug_span!("evaluate", model = %self.model()).entered();
        let output = match self {
            Self::BlackScholes(params) => ModelOutput::Price(params.price()?),
            Self::BinomialTree(params) => ModelOutput::Price(params.price()?),
            Self::MonteCarlo(params) => ModelOutput::Paths(params.simulate(rng)?),
        };
        match &output {
            ModelOutput::Price(price) => tracing::debug!(price, "priced"),
            ModelOutput::Paths(paths) => tracing::debug!(
                n_steps = paths.n_steps(),
                n_simulations = paths.n_simulations(),
                "simulated"
            ),
        }
        Ok(output)
    }
}

/// What a model returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelOutput {
    Price(f64),
    Paths(PathEnsemble),
}

impl ModelOutput {
    pub fn price(&self) -> Option<f64> {
        match self {
            Self::Price(price) => Some(*price),
            Self::Paths(_) => None,
        }
    }

    pub fn paths(&self) -> Option<&PathEnsemble> {
        match self {
            Self::Price(_) => None,
            Self::Paths(paths) => Some(paths),
        }
    }
}
