use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::PricingError;

/// Plain-vanilla option side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Call option payoff profile.
    Call,
    /// Put option payoff profile.
    Put,
}

impl OptionType {
    /// Both sides, calls first.
    pub const ALL: [Self; 2] = [Self::Call, Self::Put];

    /// Payoff at expiry for a terminal spot.
    #[inline]
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            Self::Call => (spot - strike).max(0.0),
            Self::Put => (strike - spot).max(0.0),
        }
    }

    /// Lowercase label used in requests and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    /// Parses `"call"` or `"put"`, ignoring ASCII case.
    ///
    /// # Examples
    /// ```
    /// use optpricer::core::OptionType;
    ///
    /// assert_eq!("Call".parse::<OptionType>().unwrap(), OptionType::Call);
    /// assert!("straddle".parse::<OptionType>().is_err());
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("call") {
            Ok(Self::Call)
        } else if trimmed.eq_ignore_ascii_case("put") {
            Ok(Self::Put)
        } else {
            Err(PricingError::InvalidArgument(format!(
                "option type must be `call` or `put`, got `{raw}`"
            )))
        }
    }
}
