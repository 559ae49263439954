//! Market snapshot consumed by the pricing engines.

use crate::core::PricingError;

/// Market snapshot used by all pricing engines.
///
/// Volatility is a single flat number: no term structure, no smile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Market {
    /// Spot price.
    pub spot: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Flat lognormal volatility.
    pub vol: f64,
}

impl Market {
    /// Starts a market builder.
    ///
    /// # Examples
    /// ```
    /// use optpricer::market::Market;
    ///
    /// let market = Market::builder()
    ///     .spot(100.0)
    ///     .rate(0.05)
    ///     .flat_vol(0.20)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(market.spot(), 100.0);
    /// ```
    #[inline]
    pub fn builder() -> MarketBuilder {
        MarketBuilder::default()
    }

    /// Returns spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns flat volatility.
    #[inline]
    pub fn vol(&self) -> f64 {
        self.vol
    }
}

/// Builder for [`Market`].
#[derive(Debug, Clone, Default)]
pub struct MarketBuilder {
    spot: Option<f64>,
    rate: Option<f64>,
    flat_vol: Option<f64>,
}

impl MarketBuilder {
    /// Sets the spot price.
    #[inline]
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the flat risk-free rate.
    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets a flat volatility.
    #[inline]
    pub fn flat_vol(mut self, vol: f64) -> Self {
        self.flat_vol = Some(vol);
        self
    }

    /// Validates and builds a [`Market`].
    ///
    /// Zero volatility is accepted here; engines that cannot handle it reject it themselves.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidArgument`] when spot or volatility is missing,
    /// spot is non-positive, volatility is negative, or any field is non-finite.
    pub fn build(self) -> Result<Market, PricingError> {
        let spot = self
            .spot
            .ok_or_else(|| PricingError::InvalidArgument("market spot is required".to_string()))?;
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::InvalidArgument(
                "market spot must be finite and > 0".to_string(),
            ));
        }

        let rate = self.rate.unwrap_or(0.0);
        if !rate.is_finite() {
            return Err(PricingError::InvalidArgument(
                "market rate must be finite".to_string(),
            ));
        }

        let vol = self.flat_vol.ok_or_else(|| {
            PricingError::InvalidArgument("market flat_vol is required".to_string())
        })?;
        if !vol.is_finite() || vol < 0.0 {
            return Err(PricingError::InvalidArgument(
                "market flat_vol must be finite and >= 0".to_string(),
            ));
        }

        Ok(Market { spot, rate, vol })
    }
}
