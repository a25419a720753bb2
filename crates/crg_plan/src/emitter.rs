//! The off-chip SDRAM reference clock.

use crate::domain::sdram_reference_domain;
use crate::error::PlanError;
use crate::registry::DomainRegistry;
use crg_board::{Board, PinHandle};
use crg_common::{Frequency, InternalError, Phase};
use crg_config::SdramRate;
use serde::Serialize;
use tracing::info;

/// The DDR output cell used to forward a clock off-chip.
pub const DDR_OUTPUT_PRIMITIVE: &str = "ODDRX1F";

/// A DDR output driver forwarding one domain to a board pin.
///
/// Feeding a constant high on the rising edge and low on the falling edge
/// reproduces the domain clock on the pin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DdrOutput {
    /// Output cell name.
    pub primitive: String,
    /// The domain that clocks the driver.
    pub domain: String,
    /// Frequency forwarded to the pin.
    pub frequency: Frequency,
    /// Phase of the forwarded clock.
    pub phase: Phase,
    /// The destination pin.
    pub pin: PinHandle,
    /// Value launched on the rising edge.
    pub d0: bool,
    /// Value launched on the falling edge.
    pub d1: bool,
}

/// Instantiates the DDR output for the SDRAM clock pin.
#[derive(Debug, Default)]
pub struct BoardClockEmitter;

impl BoardClockEmitter {
    /// Selects the SDRAM reference domain for `rate` and drives it to the
    /// board's SDRAM clock pin.
    ///
    /// # Errors
    ///
    /// - [`PlanError::Internal`] if the reference domain is missing; the
    ///   planner always derives it, so this is a planning bug.
    /// - [`PlanError::Configuration`] if the board has no SDRAM clock pin.
    pub fn emit(
        &self,
        registry: &DomainRegistry,
        rate: SdramRate,
        board: &dyn Board,
    ) -> Result<DdrOutput, PlanError> {
        let name = sdram_reference_domain(rate);
        let domain = registry.lookup(name).map_err(|e| {
            InternalError::new(format!("SDRAM reference domain missing for rate {rate}: {e}"))
        })?;
        let pin = board.request(board.sdram_clock_pin())?;
        info!(domain = name, pin = %pin, "SDRAM clock forwarded");
        Ok(DdrOutput {
            primitive: DDR_OUTPUT_PRIMITIVE.to_string(),
            domain: domain.name.clone(),
            frequency: domain.achieved_frequency,
            phase: domain.achieved_phase,
            pin,
            d0: true,
            d1: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SYSTEM_DOUBLE_RATE_PHASE_SHIFTED, SYSTEM_PHASE_SHIFTED};
    use crate::planner::PllPlanner;
    use crate::reset::ResetController;
    use crate::source::resolve_clock_source;
    use crg_board::load_board;
    use crg_config::CrgFlags;
    use crg_pll::Ecp5Pll;
    use std::sync::Arc;

    fn registry(flags: &CrgFlags) -> DomainRegistry {
        let board = load_board("i5", "7.0").unwrap();
        let source = Arc::new(resolve_clock_source(board.as_ref(), false, 5).unwrap());
        let reset = ResetController::new(board.as_ref()).unwrap().condition();
        let pll = Ecp5Pll::new();
        PllPlanner::new(&pll)
            .plan(flags, &source, &reset)
            .unwrap()
            .registry
    }

    #[test]
    fn full_rate_forwards_phase_shifted_system() {
        let board = load_board("i5", "7.0").unwrap();
        let reg = registry(&CrgFlags::default());
        let out = BoardClockEmitter
            .emit(&reg, SdramRate::Full, board.as_ref())
            .unwrap();
        assert_eq!(out.domain, SYSTEM_PHASE_SHIFTED);
        assert_eq!(out.primitive, "ODDRX1F");
        assert_eq!(out.pin.site, "B9");
        assert!(out.d0 && !out.d1);
        assert_eq!(out.phase, Phase::HALF_CYCLE);
    }

    #[test]
    fn half_rate_forwards_double_rate_shifted() {
        let board = load_board("i9", "7.2").unwrap();
        let flags = CrgFlags {
            sdram_rate: SdramRate::Half,
            ..CrgFlags::default()
        };
        let reg = registry(&flags);
        let out = BoardClockEmitter
            .emit(&reg, SdramRate::Half, board.as_ref())
            .unwrap();
        assert_eq!(out.domain, SYSTEM_DOUBLE_RATE_PHASE_SHIFTED);
        assert_eq!(out.frequency, Frequency::from_mhz(120.0));
    }

    #[test]
    fn missing_reference_is_internal_error() {
        let board = load_board("i5", "7.0").unwrap();
        // A 1:1 registry has no double-rate domain.
        let reg = registry(&CrgFlags::default());
        let err = BoardClockEmitter
            .emit(&reg, SdramRate::Half, board.as_ref())
            .unwrap_err();
        assert!(matches!(err, PlanError::Internal(_)));
    }
}
