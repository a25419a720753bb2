//! One complete planning pass over a board.

use crate::emitter::{BoardClockEmitter, DdrOutput};
use crate::error::PlanError;
use crate::planner::{ClockPlan, PllPlanner};
use crate::pll::PllInstance;
use crate::registry::DomainRegistry;
use crate::reset::{ResetCondition, ResetController};
use crate::source::{resolve_clock_source, ClockSource};
use crg_board::Board;
use crg_config::CrgFlags;
use crg_pll::PllPrimitive;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Identity of the board a topology was planned for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardInfo {
    /// Canonical board name.
    pub name: String,
    /// Board revision.
    pub revision: String,
    /// FPGA part number.
    pub device: String,
}

/// A finished clock/reset topology. Immutable once built.
#[derive(Debug, Clone)]
pub struct ClockTopology {
    /// The flags the topology was planned from.
    pub flags: CrgFlags,
    /// The target board.
    pub board: BoardInfo,
    /// The root clock source.
    pub source: Arc<ClockSource>,
    /// The reset condition shared by every PLL.
    pub reset: Arc<ResetCondition>,
    /// Allocated PLLs, primary first.
    pub plls: Vec<PllInstance>,
    /// The realized domains.
    pub registry: DomainRegistry,
    /// The SDRAM clock output driver.
    pub sdram_clock: DdrOutput,
}

/// Builds a topology: source, reset, PLLs and domains, then the SDRAM clock.
///
/// # Errors
///
/// Returns the first [`PlanError`] hit along the way. Nothing is returned
/// partially built.
pub fn build_topology(
    flags: &CrgFlags,
    board: &dyn Board,
    primitive: &dyn PllPrimitive,
) -> Result<ClockTopology, PlanError> {
    info!(
        board = board.name(),
        revision = board.revision(),
        sys_clk_freq = %flags.sys_clk_freq,
        "planning clock topology"
    );

    let source = Arc::new(resolve_clock_source(
        board,
        flags.use_internal_osc,
        flags.osc_divider,
    )?);
    let controller = ResetController::new(board)?;
    let reset = controller.condition();

    let ClockPlan { plls, registry } = PllPlanner::new(primitive).plan(flags, &source, &reset)?;
    controller.verify(&plls)?;

    let sdram_clock = BoardClockEmitter.emit(&registry, flags.sdram_rate, board)?;

    Ok(ClockTopology {
        flags: *flags,
        board: BoardInfo {
            name: board.name().to_string(),
            revision: board.revision().to_string(),
            device: board.device().to_string(),
        },
        source,
        reset,
        plls,
        registry,
        sdram_clock,
    })
}

impl ClockTopology {
    /// Returns the PLL that owns the `system` domain.
    pub fn primary_pll(&self) -> Option<&PllInstance> {
        self.plls.iter().find(|p| p.is_primary())
    }

    /// Returns the PLL with the given ID.
    pub fn pll(&self, id: crate::PllId) -> Option<&PllInstance> {
        self.plls.iter().find(|p| p.id == id)
    }
}
