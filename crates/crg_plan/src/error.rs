//! Error types for clock/reset planning.

use crate::ids::PllId;
use crate::pll::PllRole;
use crate::registry::LookupError;
use crg_board::BoardError;
use crg_common::{Frequency, InternalError, Phase};
use crg_pll::PllError;

/// A fatal planning failure.
///
/// Planning is deterministic, so none of these are transient: the same flags
/// fail the same way on every run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// An invalid flag value, flag combination, or board description.
    #[error("configuration error in '{flag}': {message}")]
    Configuration {
        /// The offending flag or board resource.
        flag: String,
        /// What is wrong with it.
        message: String,
    },

    /// A requested domain cannot be produced by its PLL within its margin.
    #[error(
        "clock domain '{domain}' ({frequency} at {phase}, margin {margin}) is infeasible on {pll} ({role}): {reason}"
    )]
    InfeasibleDomain {
        /// The domain that could not be added.
        domain: String,
        /// Requested frequency.
        frequency: Frequency,
        /// Requested phase.
        phase: Phase,
        /// Declared margin.
        margin: f64,
        /// The owning PLL.
        pll: PllId,
        /// The owning PLL's role.
        role: PllRole,
        /// The primitive's reason for rejecting the configuration.
        reason: PllError,
    },

    /// A domain was requested that the active flags never derive.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The planner violated one of its own invariants.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PlanError {
    /// Creates a configuration error for the given flag.
    pub fn configuration(flag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            flag: flag.into(),
            message: message.into(),
        }
    }

    /// Returns the name of the flag or domain the error points at.
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::Configuration { flag, .. } => Some(flag),
            Self::InfeasibleDomain { domain, .. } => Some(domain),
            Self::Lookup(LookupError::NotFound { name, .. }) => Some(name),
            Self::Internal(_) => None,
        }
    }
}

impl From<BoardError> for PlanError {
    fn from(err: BoardError) -> Self {
        let flag = match &err {
            BoardError::UnknownBoard { .. } => "board.name".to_string(),
            BoardError::UnsupportedRevision { .. } => "board.revision".to_string(),
            BoardError::PinUnavailable { pin, .. } => format!("pin {pin}"),
        };
        Self::Configuration {
            flag,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_errors_become_configuration_errors() {
        let err: PlanError = BoardError::PinUnavailable {
            pin: "clk25".to_string(),
            board: "i5 rev 7.0".to_string(),
        }
        .into();
        assert_eq!(err.subject(), Some("pin clk25"));
        assert!(matches!(err, PlanError::Configuration { .. }));
    }

    #[test]
    fn infeasible_message_names_domain_and_pll() {
        let err = PlanError::InfeasibleDomain {
            domain: "usb-48".to_string(),
            frequency: Frequency::from_mhz(48.0),
            phase: Phase::ZERO,
            margin: 0.0,
            pll: PllId::from_raw(1),
            role: PllRole::Usb,
            reason: PllError::NoSolution {
                input: Frequency::from_mhz(62.0),
                outputs: 2,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("'usb-48'"));
        assert!(msg.contains("48MHz"));
        assert!(msg.contains("pll1 (usb)"));
        assert_eq!(err.subject(), Some("usb-48"));
    }

    #[test]
    fn internal_has_no_subject() {
        let err: PlanError = InternalError::new("bug").into();
        assert!(err.subject().is_none());
    }
}
