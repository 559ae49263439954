//! Closed-form Black-Scholes valuation of European vanilla options.
//!
//! References: Black and Scholes (1973); Hull (11th ed.) Ch. 15, Eq. (15.20)-(15.21).
//!
//! The formula divides by `sigma * sqrt(T)`, so zero volatility or zero expiry is reported
//! as a [`PricingError::NumericDomain`] instead of being patched with an intrinsic value.

use crate::core::{DiagKey, Diagnostics, OptionType, PricingEngine, PricingError, PricingResult};
use crate::instruments::vanilla::VanillaOption;
use crate::market::Market;
use crate::math::normal_cdf;

/// Analytic Black-Scholes engine for European vanilla options.
#[derive(Debug, Clone, Default)]
pub struct BlackScholesEngine;

impl BlackScholesEngine {
    /// Creates a Black-Scholes engine instance.
    pub fn new() -> Self {
        Self
    }
}

#[inline]
fn d1_d2(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> (f64, f64) {
    let sig_sqrt_t = vol * expiry.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * expiry) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

fn validate_inputs(
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> Result<(), PricingError> {
    if !spot.is_finite() || spot <= 0.0 {
        return Err(PricingError::InvalidArgument(
            "spot must be finite and > 0".to_string(),
        ));
    }
    if !strike.is_finite() || strike <= 0.0 {
        return Err(PricingError::InvalidArgument(
            "strike must be finite and > 0".to_string(),
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
    if vol == 0.0 || expiry == 0.0 {
        return Err(PricingError::NumericDomain(
            "Black-Scholes requires vol > 0 and expiry > 0 (sigma * sqrt(T) is a divisor)"
                .to_string(),
        ));
    }
    Ok(())
}

/// Prices from already-validated inputs and returns `(price, d1, d2)`.
#[inline]
fn price_with_d(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> (f64, f64, f64) {
    let (d1, d2) = d1_d2(spot, strike, rate, vol, expiry);
    let df_r = (-rate * expiry).exp();
    let price = match option_type {
        OptionType::Call => spot * normal_cdf(d1) - strike * df_r * normal_cdf(d2),
        OptionType::Put => strike * df_r * normal_cdf(-d2) - spot * normal_cdf(-d1),
    };
    // Far out of the money the two terms cancel to a few ulps either side of zero.
    (price.max(0.0), d1, d2)
}

impl PricingEngine<VanillaOption> for BlackScholesEngine {
    fn price(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<PricingResult, PricingError> {
        instrument.validate()?;
        validate_inputs(
            market.spot,
            instrument.strike,
            market.rate,
            market.vol,
            instrument.expiry,
        )?;

        let (price, d1, d2) = price_with_d(
            instrument.option_type,
            market.spot,
            instrument.strike,
            market.rate,
            market.vol,
            instrument.expiry,
        );

        let mut diagnostics = Diagnostics::new();
        diagnostics.insert_key(DiagKey::Vol, market.vol);
        diagnostics.insert_key(DiagKey::D1, d1);
        diagnostics.insert_key(DiagKey::D2, d2);
        diagnostics.insert_key(
            DiagKey::DiscountFactor,
            (-market.rate * instrument.expiry).exp(),
        );

        Ok(PricingResult { price, diagnostics })
    }
}

/// One-liner Black-Scholes price of a European option.
///
/// # Errors
/// - [`PricingError::InvalidArgument`] for non-positive spot/strike, negative or
///   non-finite inputs.
/// - [`PricingError::NumericDomain`] when `vol == 0` or `expiry == 0`.
///
/// # Examples
/// ```
/// use optpricer::core::OptionType;
/// use optpricer::engines::analytic::black_scholes;
///
/// let call = black_scholes(OptionType::Call, 100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
/// assert!((call - 10.4506).abs() < 1e-4);
/// ```
pub fn black_scholes(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> Result<f64, PricingError> {
    validate_inputs(spot, strike, rate, vol, expiry)?;
    Ok(price_with_d(option_type, spot, strike, rate, vol, expiry).0)
}
