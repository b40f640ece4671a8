use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::bytes::{Bytes, PrefixType};
use super::errors::UnitError;

/// `<number>[%]`, e.g. `"50%"` or `"0.5"`.
static FRACTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+\.?\d*)\s*(%?)\s*$").expect("Invalid fraction pattern")
});

/// How a quota rounds `max * fraction` to whole bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoundingMethod {
    #[default]
    Nearest,
    Down,
    Up,
}

impl RoundingMethod {
    fn apply(self, x: f64) -> i64 {
        match self {
            RoundingMethod::Nearest => x.round() as i64,
            RoundingMethod::Down => x as i64,
            RoundingMethod::Up => x.ceil() as i64,
        }
    }
}

/// A share of a maximum byte count.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quota {
    max: Bytes,
    fraction: f64,
    rounding: RoundingMethod,
}

impl Quota {
    pub fn new(max: Bytes, fraction: f64) -> Self {
        Self {
            max,
            fraction,
            rounding: RoundingMethod::default(),
        }
    }

    /// Quota expressed as an absolute allotment out of `max`.
    pub fn from_allotted(max: Bytes, allotted: Bytes) -> Self {
        Self::new(max, allotted / max)
    }

    /// Parse a quota of `max` from a percentage (`"50%"`), a decimal
    /// fraction (`"0.5"`) or an absolute byte count (`"512 MiB"`).
    pub fn parse(max: Bytes, text: &str) -> Result<Self, UnitError> {
        if let Ok(fraction) = parse_fraction(text) {
            return Ok(Self::new(max, fraction));
        }

        let allotted = Bytes::parse(text).map_err(|e| UnitError::InvalidQuota {
            input: text.to_string(),
            source: Box::new(e),
        })?;
        Ok(Self::from_allotted(max, allotted))
    }

    pub fn with_rounding(mut self, method: RoundingMethod) -> Self {
        self.rounding = method;
        self
    }

    pub fn set_rounding_method(&mut self, method: RoundingMethod) {
        self.rounding = method;
    }

    pub fn max(&self) -> Bytes {
        self.max
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// The allotted byte count, `max * fraction` rounded to whole bytes.
    pub fn bytes(&self) -> Bytes {
        Bytes::new(self.rounding.apply(self.max.get() as f64 * self.fraction))
    }

    pub fn format(&self, prefix_type: PrefixType, precision: usize) -> String {
        self.bytes().format(prefix_type, precision)
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.bytes(), f)
    }
}

/// Parse a percentage or decimal fraction into a fraction of one.
pub fn parse_fraction(text: &str) -> Result<f64, UnitError> {
    let invalid = || UnitError::InvalidFraction {
        input: text.to_string(),
    };
    let caps = FRACTION_PATTERN.captures(text).ok_or_else(invalid)?;
    let value: f64 = caps[1].parse().map_err(|_| invalid())?;
    let divisor: f64 = if caps[2].is_empty() { 1.0 } else { 100.0 };
    Ok(value / divisor)
}
