//! Canonical plain-vanilla option contract used by every engine in the crate.
//!
//! [`VanillaOption`] stores side, strike, and expiry. Exercise is always European:
//! the lattice engine performs no early-exercise check.
//! References: Hull (2018), Ch. 10-13 for payoff conventions.

use serde::{Deserialize, Serialize};

use crate::core::{Instrument, OptionType, PricingError};

/// European vanilla option contract.
///
/// # Examples
/// ```
/// use optpricer::core::OptionType;
/// use optpricer::instruments::VanillaOption;
///
/// let option = VanillaOption {
///     option_type: OptionType::Call,
///     strike: 100.0,
///     expiry: 1.0,
/// };
/// assert!(option.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VanillaOption {
    /// Call or put.
    pub option_type: OptionType,
    /// Strike level.
    pub strike: f64,
    /// Expiry in years.
    pub expiry: f64,
}

impl VanillaOption {
    /// Builds a European call option.
    ///
    /// # Examples
    /// ```
    /// use optpricer::core::OptionType;
    /// use optpricer::instruments::VanillaOption;
    ///
    /// let call = VanillaOption::european_call(100.0, 1.0);
    /// assert_eq!(call.option_type, OptionType::Call);
    /// ```
    pub fn european_call(strike: f64, expiry: f64) -> Self {
        Self {
            option_type: OptionType::Call,
            strike,
            expiry,
        }
    }

    /// Builds a European put option.
    pub fn european_put(strike: f64, expiry: f64) -> Self {
        Self {
            option_type: OptionType::Put,
            strike,
            expiry,
        }
    }

    /// Validates contract fields.
    ///
    /// `expiry == 0` passes here; engines decide whether they can price it.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidArgument`] when strike is not finite and positive
    /// or expiry is negative or non-finite.
    pub fn validate(&self) -> Result<(), PricingError> {
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(PricingError::InvalidArgument(
                "vanilla strike must be finite and > 0".to_string(),
            ));
        }
        if !self.expiry.is_finite() || self.expiry < 0.0 {
            return Err(PricingError::InvalidArgument(
                "vanilla expiry must be finite and >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Instrument for VanillaOption {
    fn instrument_type(&self) -> &str {
        "VanillaOption"
    }
}
