//! Error types for PLL feasibility checks.

use crg_common::{Frequency, Phase};

/// Reasons a PLL primitive cannot produce a requested configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PllError {
    /// A PLL was asked to solve with no outputs.
    #[error("no outputs requested")]
    NoOutputs,

    /// More outputs were requested than the primitive has.
    #[error("{requested} outputs requested, primitive has {max}")]
    TooManyOutputs {
        /// Number of outputs requested.
        requested: usize,
        /// Number of outputs available.
        max: usize,
    },

    /// The reference frequency is outside the primitive's input range.
    #[error("input frequency {frequency} outside {min}..{max}")]
    InputOutOfRange {
        /// The reference frequency.
        frequency: Frequency,
        /// Lowest accepted input.
        min: Frequency,
        /// Highest accepted input.
        max: Frequency,
    },

    /// An output frequency is outside the primitive's output range.
    #[error("output {index} frequency {frequency} outside {min}..{max}")]
    OutputOutOfRange {
        /// Position of the output in the request list.
        index: usize,
        /// The requested frequency.
        frequency: Frequency,
        /// Lowest achievable output.
        min: Frequency,
        /// Highest achievable output.
        max: Frequency,
    },

    /// An output phase is outside `[0, 360)`.
    #[error("output {index} phase {phase} outside 0..360deg")]
    PhaseOutOfRange {
        /// Position of the output in the request list.
        index: usize,
        /// The requested phase.
        phase: Phase,
    },

    /// No divider combination reproduces every output within its margin.
    #[error("no divider combination reproduces all {outputs} outputs from {input}")]
    NoSolution {
        /// The reference frequency.
        input: Frequency,
        /// Number of outputs requested.
        outputs: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_no_solution() {
        let err = PllError::NoSolution {
            input: Frequency::from_mhz(25.0),
            outputs: 2,
        };
        assert_eq!(
            err.to_string(),
            "no divider combination reproduces all 2 outputs from 25MHz"
        );
    }

    #[test]
    fn display_too_many() {
        let err = PllError::TooManyOutputs {
            requested: 4,
            max: 3,
        };
        assert_eq!(err.to_string(), "4 outputs requested, primitive has 3");
    }
}
