//! `optpricer` prices European options under three independent models: closed-form
//! Black-Scholes, a Cox-Ross-Rubinstein binomial tree, and geometric-Brownian-motion
//! Monte Carlo path simulation. A closed [`registry`] maps model names to the engines.
//!
//! References used across modules include:
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), notably Ch. 13, 15, 21.
//! - Cox, Ross and Rubinstein (1979) for the recombining lattice.
//! - Glasserman (2004) for exact GBM path simulation.
//!
//! Numerical considerations:
//! - The normal CDF is `erfc`-based and accurate to double precision.
//! - The tree converges to Black-Scholes at first order in the step count and rejects
//!   step sizes whose risk-neutral probability leaves `[0, 1]`.
//! - Monte Carlo takes the generator (or a seed) from the caller; nothing draws from a
//!   process-wide RNG, so results are reproducible and calls can run concurrently.
//!
//! # Feature Flags
//! - `parallel`: enables Rayon-powered parallel path simulation.
//!
//! # Quick Start
//! Price a Black-Scholes call:
//! ```rust
//! use optpricer::core::OptionType;
//! use optpricer::engines::analytic::black_scholes;
//!
//! let px = black_scholes(OptionType::Call, 100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
//! assert!(px > 10.0 && px < 11.0);
//! ```
//!
//! Price the same option on a lattice through the engine API:
//! ```rust
//! use optpricer::core::PricingEngine;
//! use optpricer::engines::tree::BinomialTreeEngine;
//! use optpricer::instruments::VanillaOption;
//! use optpricer::market::Market;
//!
//! let market = Market::builder().spot(100.0).rate(0.05).flat_vol(0.20).build().unwrap();
//! let option = VanillaOption::european_call(100.0, 1.0);
//! let result = BinomialTreeEngine::new(500).price(&option, &market).unwrap();
//! assert!((result.price - 10.4506).abs() < 0.01);
//! ```
//!
//! Simulate price paths with a seeded generator:
//! ```rust
//! use optpricer::engines::monte_carlo::GbmPathSimulator;
//!
//! let paths = GbmPathSimulator::new(1_000, 252, 42)
//!     .simulate(100.0, 0.07, 0.20, 1.0)
//!     .unwrap();
//! assert_eq!(paths.shape(), (252, 1_000));
//! assert!(paths.final_prices().iter().all(|&s| s > 0.0));
//! ```
//!
//! Select a model by name:
//! ```rust
//! use optpricer::registry::resolve;
//!
//! let model = resolve("Monte Carlo").unwrap();
//! assert_eq!(model.name(), "Monte Carlo");
//! assert!(resolve("Heston").is_err());
//! ```

pub mod core;
pub mod engines;
pub mod instruments;
pub mod market;
pub mod math;
pub mod models;
pub mod registry;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::engines::analytic::*;
    pub use crate::engines::monte_carlo::*;
    pub use crate::engines::tree::*;
    pub use crate::instruments::*;
    pub use crate::market::*;
    pub use crate::registry::*;
}
