//! Frequency values with unit parsing and display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A frequency value stored in Hertz.
///
/// Supports parsing from strings like "60MHz", "12MHz", "1GHz", "48000Hz",
/// and bare numeric values (interpreted as Hz). Displays using the most
/// appropriate unit for readability.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Frequency(f64);

impl Frequency {
    /// Creates a new frequency from a value in Hertz.
    pub const fn new(hz: f64) -> Self {
        Self(hz)
    }

    /// Creates a new frequency from a value in megahertz.
    pub fn from_mhz(mhz: f64) -> Self {
        Self(mhz * 1_000_000.0)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }

    /// Returns the frequency in kilohertz.
    pub fn khz(&self) -> f64 {
        self.0 / 1_000.0
    }

    /// Returns the frequency in megahertz.
    pub fn mhz(&self) -> f64 {
        self.0 / 1_000_000.0
    }

    /// Returns the clock period in nanoseconds, or zero for a zero frequency.
    pub fn period_ns(&self) -> f64 {
        if self.0 > 0.0 {
            1_000_000_000.0 / self.0
        } else {
            0.0
        }
    }

    /// Returns `true` if the value is a finite, strictly positive frequency.
    pub fn is_positive(&self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    /// Returns this frequency multiplied by an integer ratio.
    pub fn times(self, factor: u32) -> Self {
        Self(self.0 * f64::from(factor))
    }

    /// Returns this frequency divided by an integer ratio.
    pub fn divided_by(self, divider: u32) -> Self {
        Self(self.0 / f64::from(divider))
    }

    /// Returns `true` if `self` lies within `target * margin` of `target`.
    ///
    /// A margin of zero requires an exact match.
    pub fn within(self, target: Frequency, margin: f64) -> bool {
        (self.0 - target.0).abs() <= target.0 * margin
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000_000.0 {
            write!(f, "{}GHz", hz / 1_000_000_000.0)
        } else if hz >= 1_000_000.0 {
            write!(f, "{}MHz", hz / 1_000_000.0)
        } else if hz >= 1_000.0 {
            write!(f, "{}KHz", hz / 1_000.0)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

/// Error type for parsing frequency strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency: '{input}'")]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let (num, scale) = if let Some(num) = lower.strip_suffix("ghz") {
            (num, 1_000_000_000.0)
        } else if let Some(num) = lower.strip_suffix("mhz") {
            (num, 1_000_000.0)
        } else if let Some(num) = lower.strip_suffix("khz") {
            (num, 1_000.0)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            // Bare number, interpreted as Hz. Accepts "60e6" as well.
            (lower.as_str(), 1.0)
        };

        let val: f64 = num.trim().parse().map_err(|_| err())?;
        if !val.is_finite() {
            return Err(err());
        }
        Ok(Frequency(val * scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mhz() {
        let f: Frequency = "60MHz".parse().unwrap();
        assert_eq!(f.hz(), 60_000_000.0);
    }

    #[test]
    fn parse_khz() {
        let f: Frequency = "100KHz".parse().unwrap();
        assert_eq!(f.hz(), 100_000.0);
    }

    #[test]
    fn parse_bare_number_and_exponent() {
        let a: Frequency = "25000000".parse().unwrap();
        let b: Frequency = "60e6".parse().unwrap();
        assert_eq!(a.hz(), 25_000_000.0);
        assert_eq!(b.hz(), 60_000_000.0);
    }

    #[test]
    fn parse_case_insensitive() {
        let f: Frequency = "48mhz".parse().unwrap();
        assert_eq!(f.hz(), 48_000_000.0);
    }

    #[test]
    fn parse_invalid() {
        assert!("not_a_freq".parse::<Frequency>().is_err());
        assert!("infMHz".parse::<Frequency>().is_err());
    }

    #[test]
    fn integer_ratios_are_exact() {
        let osc = Frequency::from_mhz(310.0).divided_by(5);
        assert_eq!(osc.hz(), 62_000_000.0);
        assert_eq!(Frequency::from_mhz(40.0).times(5).hz(), 200_000_000.0);
    }

    #[test]
    fn within_margin() {
        let target = Frequency::from_mhz(60.0);
        assert!(Frequency::new(60_500_000.0).within(target, 0.01));
        assert!(!Frequency::new(60_700_000.0).within(target, 0.01));
        assert!(target.within(target, 0.0));
        assert!(!Frequency::new(60_000_001.0).within(target, 0.0));
    }

    #[test]
    fn period() {
        assert_eq!(Frequency::from_mhz(25.0).period_ns(), 40.0);
        assert_eq!(Frequency::new(0.0).period_ns(), 0.0);
    }

    #[test]
    fn display_selects_best_unit() {
        assert_eq!(format!("{}", Frequency::new(1_000_000_000.0)), "1GHz");
        assert_eq!(format!("{}", Frequency::new(62_000_000.0)), "62MHz");
        assert_eq!(format!("{}", Frequency::new(100_000.0)), "100KHz");
        assert_eq!(format!("{}", Frequency::new(500.0)), "500Hz");
    }

    #[test]
    fn serializes_as_plain_hz() {
        let json = serde_json::to_string(&Frequency::from_mhz(48.0)).unwrap();
        assert_eq!(json, "48000000.0");
        let back: Frequency = serde_json::from_str("12000000").unwrap();
        assert_eq!(back, Frequency::from_mhz(12.0));
    }
}
