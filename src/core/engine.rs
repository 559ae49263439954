//! Engine traits, result payloads, and the library-wide error type.

use crate::market::Market;

/// Common trait implemented by every priceable instrument.
pub trait Instrument: std::fmt::Debug {
    /// Returns a short type identifier for diagnostics and reports.
    fn instrument_type(&self) -> &str;
}

/// Pricing engine abstraction over an instrument type.
pub trait PricingEngine<I: Instrument> {
    /// Prices an instrument under the provided market state.
    fn price(&self, instrument: &I, market: &Market) -> Result<PricingResult, PricingError>;
}

/// Compact key set for engine diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagKey {
    D1,
    D2,
    DiscountFactor,
    Down,
    NumSteps,
    Pu,
    Up,
    Vol,
}

impl DiagKey {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::D1 => "d1",
            Self::D2 => "d2",
            Self::DiscountFactor => "discount_factor",
            Self::Down => "d",
            Self::NumSteps => "num_steps",
            Self::Pu => "pu",
            Self::Up => "u",
            Self::Vol => "vol",
        }
    }
}

impl std::str::FromStr for DiagKey {
    type Err = ();

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "d1" => Ok(Self::D1),
            "d2" => Ok(Self::D2),
            "discount_factor" => Ok(Self::DiscountFactor),
            "d" => Ok(Self::Down),
            "num_steps" => Ok(Self::NumSteps),
            "pu" => Ok(Self::Pu),
            "u" => Ok(Self::Up),
            "vol" => Ok(Self::Vol),
            _ => Err(()),
        }
    }
}

/// Inline diagnostics storage used in [`PricingResult`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    entries: [Option<(DiagKey, f64)>; 8],
}

impl Diagnostics {
    pub const CAPACITY: usize = 8;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries[0].is_none()
    }

    /// Inserts or overwrites a value, returning the previous one.
    ///
    /// The key set is smaller than [`Self::CAPACITY`], so a free slot always exists.
    #[inline]
    pub fn insert_key(&mut self, key: DiagKey, value: f64) -> Option<f64> {
        for (entry_key, existing) in self.entries.iter_mut().flatten() {
            if *entry_key == key {
                let prev = *existing;
                *existing = value;
                return Some(prev);
            }
        }

        if let Some(slot) = self.entries.iter_mut().find(|entry| entry.is_none()) {
            *slot = Some((key, value));
        }
        None
    }

    #[inline]
    fn iter_entries(&self) -> impl Iterator<Item = &(DiagKey, f64)> {
        self.entries.iter().filter_map(Option::as_ref)
    }

    #[inline]
    pub fn get_key(&self, key: DiagKey) -> Option<f64> {
        self.iter_entries()
            .find_map(|(entry_key, value)| (*entry_key == key).then_some(*value))
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<f64> {
        let key: DiagKey = key.parse().ok()?;
        self.get_key(key)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        self.iter_entries().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Unified engine result payload.
#[derive(Debug, Clone)]
pub struct PricingResult {
    /// Present value.
    pub price: f64,
    /// Engine-specific scalar diagnostics.
    pub diagnostics: Diagnostics,
}

/// Engine, registry, and model errors surfaced by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Input outside the accepted range (option side, counts, non-positive prices).
    InvalidArgument(String),
    /// Inputs that are individually valid but leave the model's numerical domain.
    NumericDomain(String),
    /// Registry lookup for a model name that does not exist.
    NotFound(String),
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::NumericDomain(msg) => write!(f, "numeric domain error: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
        }
    }
}

impl std::error::Error for PricingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_overwrite_and_lookup_by_name() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        assert_eq!(diagnostics.insert_key(DiagKey::Vol, 0.2), None);
        assert_eq!(diagnostics.insert_key(DiagKey::Vol, 0.3), Some(0.2));
        diagnostics.insert_key(DiagKey::NumSteps, 100.0);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.get("vol"), Some(0.3));
        assert!(diagnostics.contains_key("num_steps"));
        assert!(!diagnostics.contains_key("d1"));
        assert!(!diagnostics.contains_key("not_a_key"));
    }

    #[test]
    fn every_key_round_trips_through_its_label() {
        let keys = [
            DiagKey::D1,
            DiagKey::D2,
            DiagKey::DiscountFactor,
            DiagKey::Down,
            DiagKey::NumSteps,
            DiagKey::Pu,
            DiagKey::Up,
            DiagKey::Vol,
        ];
        assert!(keys.len() <= Diagnostics::CAPACITY);
        for key in keys {
            assert_eq!(key.as_str().parse::<DiagKey>(), Ok(key));
        }
    }

    #[test]
    fn error_display_names_the_category() {
        let err = PricingError::NotFound("model `Heston`".to_string());
        assert_eq!(err.to_string(), "not found: model `Heston`");
    }
}
