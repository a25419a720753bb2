//! Phase offsets expressed in degrees of one clock period.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A phase offset in degrees, relative to the owning PLL's reference edge.
///
/// Values are kept as given; the PLL model decides which offsets it can
/// reproduce. Valid offsets lie in `[0, 360)`.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Phase(f64);

impl Phase {
    /// No phase offset.
    pub const ZERO: Phase = Phase(0.0);

    /// Half a period: the clock is inverted relative to its reference.
    pub const HALF_CYCLE: Phase = Phase(180.0);

    /// Creates a phase offset from a value in degrees.
    pub const fn degrees(deg: f64) -> Self {
        Self(deg)
    }

    /// Returns the offset in degrees.
    pub fn as_degrees(&self) -> f64 {
        self.0
    }

    /// Returns `true` if the offset lies in `[0, 360)`.
    pub fn is_normalized(&self) -> bool {
        self.0.is_finite() && (0.0..360.0).contains(&self.0)
    }

    /// Converts the offset to a delay in nanoseconds for a clock of the given period.
    pub fn delay_ns(&self, period_ns: f64) -> f64 {
        period_ns * self.0 / 360.0
    }
}

impl fmt::Debug for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase({self})")
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}deg", self.0)
    }
}
