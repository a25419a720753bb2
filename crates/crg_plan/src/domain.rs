//! Named clock domains and the names the planner derives.

use crate::ids::PllId;
use crg_common::{Frequency, Phase};
use crg_config::SdramRate;
use serde::Serialize;

/// The system clock, always present.
pub const SYSTEM: &str = "system";
/// System frequency shifted by 180 degrees; SDRAM reference in 1:1 mode.
pub const SYSTEM_PHASE_SHIFTED: &str = "system-phase-shifted";
/// Twice the system frequency, for the half-rate SDRAM PHY (1:2 mode).
pub const SYSTEM_DOUBLE_RATE: &str = "system-double-rate";
/// Twice the system frequency shifted by 180 degrees; SDRAM reference in 1:2 mode.
pub const SYSTEM_DOUBLE_RATE_PHASE_SHIFTED: &str = "system-double-rate-phase-shifted";
/// USB full-speed bit clock.
pub const USB_12: &str = "usb-12";
/// USB PHY sampling clock.
pub const USB_48: &str = "usb-48";
/// Video pixel clock.
pub const VIDEO_PIXEL: &str = "video-pixel";
/// Video serializer clock.
pub const VIDEO_SERIALIZER: &str = "video-serializer";

/// Returns the domain that feeds the SDRAM clock pin for a given rate.
pub fn sdram_reference_domain(rate: SdramRate) -> &'static str {
    match rate {
        SdramRate::Full => SYSTEM_PHASE_SHIFTED,
        SdramRate::Half => SYSTEM_DOUBLE_RATE_PHASE_SHIFTED,
    }
}

/// A named, derived clock signal. Write-once: never changes after planning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockDomain {
    /// Unique domain name.
    pub name: String,
    /// The PLL producing this domain.
    pub pll: PllId,
    /// Requested frequency.
    pub frequency: Frequency,
    /// Requested phase offset.
    pub phase: Phase,
    /// Declared margin for the feasibility check.
    pub margin: f64,
    /// Frequency the PLL actually produces.
    pub achieved_frequency: Frequency,
    /// Phase the PLL actually produces.
    pub achieved_phase: Phase,
}

impl ClockDomain {
    /// Returns the domain name as an HDL identifier (`system-double-rate` → `system_double_rate`).
    pub fn signal_name(&self) -> String {
        self.name.replace('-', "_")
    }
}
