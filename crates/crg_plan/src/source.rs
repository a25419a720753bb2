//! Root clock source resolution.
//!
//! The topology is clocked either from the board crystal or from the ECP5
//! on-chip oscillator (`OSCG`) divided down by a fixed integer divider.

use crate::error::PlanError;
use crg_board::{Board, PinHandle};
use crg_common::Frequency;
use serde::Serialize;
use tracing::info;

/// Nominal frequency of the on-chip oscillator before its divider.
pub const INTERNAL_OSC_BASE_HZ: f64 = 310_000_000.0;

/// Cell name of the on-chip oscillator primitive.
pub const INTERNAL_OSC_PRIMITIVE: &str = "OSCG";

/// Where the root clock comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceKind {
    /// A board pin driven by an external oscillator.
    ExternalPin {
        /// The clock input pin.
        pin: PinHandle,
    },
    /// The on-chip oscillator, divided by `divider`.
    InternalOscillator {
        /// The integer divider applied to the oscillator.
        divider: u32,
    },
}

/// The root timing reference of the topology. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockSource {
    /// Pin or oscillator identity.
    pub kind: SourceKind,
    /// Nominal frequency.
    pub frequency: Frequency,
}

impl ClockSource {
    /// Returns the net name carrying the source clock.
    pub fn signal_name(&self) -> &str {
        match &self.kind {
            SourceKind::ExternalPin { pin } => &pin.name,
            SourceKind::InternalOscillator { .. } => "osc_clk",
        }
    }

    /// Returns `true` for the on-chip oscillator.
    pub fn is_internal(&self) -> bool {
        matches!(self.kind, SourceKind::InternalOscillator { .. })
    }
}

/// Resolves the root clock source for a board.
///
/// With `use_internal_osc` unset, the board's designated clock pin is
/// requested and its crystal frequency used. Otherwise the on-chip oscillator
/// runs at `INTERNAL_OSC_BASE_HZ / osc_divider`.
///
/// # Errors
///
/// Returns a configuration error if the clock pin is missing from the board
/// or the divider is zero.
pub fn resolve_clock_source(
    board: &dyn Board,
    use_internal_osc: bool,
    osc_divider: u32,
) -> Result<ClockSource, PlanError> {
    let source = if use_internal_osc {
        if osc_divider == 0 {
            return Err(PlanError::configuration(
                "clocks.osc_divider",
                "oscillator divider must be non-zero",
            ));
        }
        ClockSource {
            kind: SourceKind::InternalOscillator {
                divider: osc_divider,
            },
            frequency: Frequency::new(INTERNAL_OSC_BASE_HZ).divided_by(osc_divider),
        }
    } else {
        let pin = board.request(board.clock_pin())?;
        ClockSource {
            kind: SourceKind::ExternalPin { pin },
            frequency: board.crystal_frequency(),
        }
    };
    info!(
        source = source.signal_name(),
        frequency = %source.frequency,
        "clock source resolved"
    );
    Ok(source)
}
