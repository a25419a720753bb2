//! PLL primitive models for the crg clock/reset generator.
//!
//! The planner talks to PLLs only through the [`PllPrimitive`] trait: it
//! registers an input frequency, accumulates output requests, and asks the
//! primitive for a divider solution. [`Ecp5Pll`] models the Lattice ECP5
//! `EHXPLLL`, the only family the generator targets.
//!
//! ```
//! use crg_common::{Frequency, Phase};
//! use crg_pll::{Ecp5Pll, OutputRequest, PllPrimitive};
//!
//! let pll = Ecp5Pll::new();
//! let outputs = [OutputRequest::exact(Frequency::from_mhz(48.0), Phase::ZERO)];
//! let solution = pll.solve(Frequency::from_mhz(25.0), &outputs).unwrap();
//! assert_eq!(solution.outputs[0].achieved, Frequency::from_mhz(48.0));
//! ```

#![warn(missing_docs)]

pub mod ecp5;
pub mod error;
pub mod solution;

pub use ecp5::Ecp5Pll;
pub use error::PllError;
pub use solution::{OutputSetting, PllSolution};

use crg_common::{Frequency, Phase};
use serde::Serialize;

/// Default fractional frequency tolerance for a PLL output (1 %).
pub const DEFAULT_MARGIN: f64 = 1e-2;

/// One requested PLL output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutputRequest {
    /// Requested output frequency.
    pub frequency: Frequency,
    /// Requested phase offset relative to the reference edge.
    pub phase: Phase,
    /// Allowed fractional deviation of frequency (and of phase, as a fraction of a period).
    pub margin: f64,
}

impl OutputRequest {
    /// Creates a request with the default margin.
    pub fn new(frequency: Frequency, phase: Phase) -> Self {
        Self {
            frequency,
            phase,
            margin: DEFAULT_MARGIN,
        }
    }

    /// Creates a request that must be reproduced exactly.
    pub fn exact(frequency: Frequency, phase: Phase) -> Self {
        Self {
            frequency,
            phase,
            margin: 0.0,
        }
    }
}

/// The contract every PLL primitive model fulfils.
///
/// `solve` must be deterministic: the same input and outputs always yield the
/// same solution, so repeated plans are structurally equal.
pub trait PllPrimitive: std::fmt::Debug {
    /// Returns the primitive's cell name (e.g., "EHXPLLL").
    fn name(&self) -> &str;

    /// Returns the number of user-visible outputs.
    fn max_outputs(&self) -> usize;

    /// Returns the accepted input frequency range (inclusive).
    fn input_range(&self) -> (Frequency, Frequency);

    /// Returns the achievable output frequency range (inclusive).
    fn output_range(&self) -> (Frequency, Frequency);

    /// Computes divider settings reproducing every requested output.
    ///
    /// # Errors
    ///
    /// Returns [`PllError`] if the input or any output lies outside the
    /// primitive's ranges, or if no divider combination satisfies all outputs
    /// within their margins.
    fn solve(&self, input: Frequency, outputs: &[OutputRequest])
        -> Result<PllSolution, PllError>;

    /// Returns `true` if `frequency` lies in the input range.
    fn accepts_input(&self, frequency: Frequency) -> bool {
        let (min, max) = self.input_range();
        frequency >= min && frequency <= max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_constructors() {
        let f = Frequency::from_mhz(60.0);
        assert_eq!(OutputRequest::new(f, Phase::ZERO).margin, DEFAULT_MARGIN);
        assert_eq!(OutputRequest::exact(f, Phase::ZERO).margin, 0.0);
    }

    #[test]
    fn accepts_input_uses_range() {
        let pll = Ecp5Pll::new();
        assert!(pll.accepts_input(Frequency::from_mhz(25.0)));
        assert!(!pll.accepts_input(Frequency::from_mhz(4.0)));
        assert!(!pll.accepts_input(Frequency::from_mhz(500.0)));
    }
}
