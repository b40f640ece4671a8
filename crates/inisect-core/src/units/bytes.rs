use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use super::errors::UnitError;

/// `[-] <number> [prefix][i]B`, case-insensitive apart from the `i`.
static BYTES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?)\s*(\d+\.?\d*)\s*([kKmMgGtTpPeEzZyY]?)(i?)[bB]\s*$")
        .expect("Invalid bytes pattern")
});

const PREFIXES: [&str; 9] = ["", "K", "M", "G", "T", "P", "E", "Z", "Y"];

/// Multiplier family used when formatting a byte count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrefixType {
    /// Multiples of 1024 (`KiB`, `MiB`, ...)
    #[default]
    Binary,
    /// Multiples of 1000 (`KB`, `MB`, ...)
    Si,
}

impl PrefixType {
    fn base(self) -> f64 {
        match self {
            PrefixType::Binary => 1024.0,
            PrefixType::Si => 1000.0,
        }
    }
}

/// A signed byte count that parses from and formats to human-readable text
/// such as `"100 KiB"` or `"1.5GB"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bytes(i64);

impl Bytes {
    pub const fn new(bytes: i64) -> Self {
        Self(bytes)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    pub fn set(&mut self, bytes: i64) {
        self.0 = bytes;
    }

    /// Parse a byte count.
    ///
    /// A prefix without `i` is an SI multiple of 1000, with `i` a binary
    /// multiple of 1024. Fractional results are truncated toward zero and
    /// saturate at the bounds of `i64`.
    pub fn parse(text: &str) -> Result<Self, UnitError> {
        let invalid = || UnitError::InvalidBytes {
            input: text.to_string(),
        };
        let caps = BYTES_PATTERN.captures(text).ok_or_else(invalid)?;

        let negative = !caps[1].is_empty();
        let value: f64 = caps[2].parse().map_err(|_| invalid())?;
        let exponent = match caps[3].to_ascii_uppercase().as_str() {
            "" => 0,
            prefix => PREFIXES
                .iter()
                .position(|p| *p == prefix)
                .ok_or_else(invalid)?,
        };
        let base: f64 = if caps[4].is_empty() { 1000.0 } else { 1024.0 };

        let magnitude = value * base.powi(exponent as i32);
        let bytes = if negative { -magnitude } else { magnitude };
        Ok(Self(bytes as i64))
    }

    /// Format with the largest prefix that keeps the scaled value >= 1.
    ///
    /// Counts below one unit print as a plain integer (`"512 B"`).
    pub fn format(&self, prefix_type: PrefixType, precision: usize) -> String {
        if self.0 == 0 {
            return "0 B".to_string();
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let base = prefix_type.base();

        let mut index = 0;
        let mut divisor: f64 = 1.0;
        while index < PREFIXES.len() - 1 && magnitude as f64 >= divisor * base {
            divisor *= base;
            index += 1;
        }

        if index == 0 {
            return format!("{}{} B", sign, magnitude);
        }

        let scaled = magnitude as f64 / divisor;
        let binary = if prefix_type == PrefixType::Binary {
            "i"
        } else {
            ""
        };
        format!(
            "{}{:.*} {}{}B",
            sign, precision, scaled, PREFIXES[index], binary
        )
    }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(PrefixType::Binary, 2))
    }
}

impl FromStr for Bytes {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bytes::parse(s)
    }
}

impl From<i64> for Bytes {
    fn from(bytes: i64) -> Self {
        Self(bytes)
    }
}

// Arithmetic saturates at the bounds of `i64`, like `parse`.
impl Add for Bytes {
    type Output = Bytes;

    fn add(self, rhs: Bytes) -> Bytes {
        Bytes(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Bytes {
    type Output = Bytes;

    fn sub(self, rhs: Bytes) -> Bytes {
        Bytes(self.0.saturating_sub(rhs.0))
    }
}

impl AddAssign for Bytes {
    fn add_assign(&mut self, rhs: Bytes) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl SubAssign for Bytes {
    fn sub_assign(&mut self, rhs: Bytes) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Mul<i64> for Bytes {
    type Output = Bytes;

    fn mul(self, rhs: i64) -> Bytes {
        Bytes(self.0.saturating_mul(rhs))
    }
}

impl Div<i64> for Bytes {
    type Output = Bytes;

    fn div(self, rhs: i64) -> Bytes {
        Bytes(self.0 / rhs)
    }
}

/// Ratio of two byte counts.
impl Div for Bytes {
    type Output = f64;

    fn div(self, rhs: Bytes) -> f64 {
        self.0 as f64 / rhs.0 as f64
    }
}
