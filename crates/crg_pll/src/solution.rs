//! Divider solutions produced by a PLL primitive.

use crg_common::{Frequency, Phase};
use serde::Serialize;

/// A complete divider configuration for one PLL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PllSolution {
    /// Reference (input) divider.
    pub clki_div: u32,
    /// Feedback divider.
    pub clkfb_div: u32,
    /// Divider on the output that closes the feedback loop.
    pub feedback_div: u32,
    /// Resulting VCO frequency.
    pub vco: Frequency,
    /// Per-output settings, in request order.
    pub outputs: Vec<OutputSetting>,
}

/// Divider and phase settings for one PLL output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSetting {
    /// Primitive output port driving this output (e.g., "CLKOP").
    pub port: &'static str,
    /// Output divider.
    pub div: u32,
    /// Frequency actually produced.
    pub achieved: Frequency,
    /// Phase actually produced.
    pub phase: Phase,
    /// Coarse phase parameter, in VCO periods (includes the primitive's bias).
    pub cphase: u32,
    /// Fine phase parameter, in eighths of a VCO period.
    pub fphase: u32,
}

impl PllSolution {
    /// Frequency of the output that closes the feedback loop.
    pub fn feedback(&self) -> Frequency {
        self.vco.divided_by(self.feedback_div)
    }

    /// Returns the worst fractional frequency error over all outputs against `requested`.
    pub fn worst_error(&self, requested: &[Frequency]) -> f64 {
        self.outputs
            .iter()
            .zip(requested)
            .map(|(out, want)| (out.achieved.hz() - want.hz()).abs() / want.hz())
            .fold(0.0, f64::max)
    }
}
