//! The shared reset condition and its controller.
//!
//! Every PLL in a topology holds the same [`ResetCondition`] through an
//! `Arc`, so all PLLs enter and leave reset on the same expression. There is
//! no per-PLL override.

use crate::error::PlanError;
use crate::pll::PllInstance;
use crg_board::{Board, PinHandle};
use crg_common::{CrgResult, InternalError};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Name of the internal soft-reset request signal.
pub const SOFT_RESET_SIGNAL: &str = "soft_reset";

/// Levels of the two reset inputs at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResetInputs {
    /// Level of the active-low external reset pin (`true` = released).
    pub external_reset_n: bool,
    /// Internal soft-reset request (`true` = requested).
    pub soft_reset: bool,
}

impl ResetInputs {
    /// Inputs with the pin released and no soft reset requested.
    pub fn idle() -> Self {
        Self {
            external_reset_n: true,
            soft_reset: false,
        }
    }
}

/// `~external_reset_n | soft_reset`, shared by every PLL.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ResetCondition {
    /// The active-low external reset pin.
    pub external: PinHandle,
    /// The internal soft-reset signal name.
    pub soft_reset: String,
}

impl ResetCondition {
    /// Returns `true` if the condition holds the PLLs in reset.
    pub fn asserted(&self, inputs: ResetInputs) -> bool {
        !inputs.external_reset_n || inputs.soft_reset
    }

    /// Renders the condition as an HDL expression.
    pub fn expression(&self) -> String {
        format!("~{} | {}", self.external.name, self.soft_reset)
    }
}

/// Builds the reset condition and checks that it reached every PLL.
#[derive(Debug)]
pub struct ResetController {
    condition: Arc<ResetCondition>,
}

impl ResetController {
    /// Requests the board's reset pin and builds the shared condition.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the board has no reset pin.
    pub fn new(board: &dyn Board) -> Result<Self, PlanError> {
        let external = board.request(board.reset_pin())?;
        let condition = Arc::new(ResetCondition {
            external,
            soft_reset: SOFT_RESET_SIGNAL.to_string(),
        });
        debug!(expression = %condition.expression(), "reset condition built");
        Ok(Self { condition })
    }

    /// Returns a handle to the shared condition, for a PLL constructor.
    pub fn condition(&self) -> Arc<ResetCondition> {
        Arc::clone(&self.condition)
    }

    /// Checks that every PLL holds this controller's condition, not a copy.
    pub fn verify(&self, plls: &[PllInstance]) -> CrgResult<()> {
        for pll in plls {
            if !Arc::ptr_eq(&pll.reset, &self.condition) {
                return Err(InternalError::new(format!(
                    "{} is not wired to the shared reset condition",
                    pll.id
                )));
            }
        }
        Ok(())
    }
}
