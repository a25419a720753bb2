//! Lattice ECP5 `EHXPLLL` model and divider solver.
//!
//! The ECP5 PLL divides the reference by CLKI_DIV and divides the VCO by a
//! per-output CLKO divider. Feedback is taken internally from CLKOS3, so the
//! loop locks when VCO / CLKOS3_DIV / CLKFB_DIV equals the PFD frequency.
//! CLKOS3 is an ordinary output and must stay inside the output range, which
//! leaves CLKOP, CLKOS and CLKOS2 for user clocks. Phase is set in VCO
//! periods (CPHASE) plus eighths of a VCO period (FPHASE).

use crate::error::PllError;
use crate::solution::{OutputSetting, PllSolution};
use crate::{OutputRequest, PllPrimitive};
use crg_common::{Frequency, Phase};
use tracing::{debug, trace};

/// Output ports available to user clocks, in allocation order.
pub const OUTPUT_PORTS: [&str; 3] = ["CLKOP", "CLKOS", "CLKOS2"];

/// Range of every divider (CLKI, CLKFB, CLKO, CLKOS3), inclusive.
const DIV_RANGE: std::ops::RangeInclusive<u32> = 1..=128;

/// Fine phase steps per VCO period.
const FPHASE_STEPS: u32 = 8;

/// Slack for comparing reconstructed phases in floating point.
const PHASE_EPSILON: f64 = 1e-9;

/// Model of the ECP5 `EHXPLLL` primitive.
#[derive(Debug, Clone)]
pub struct Ecp5Pll {
    input_range: (Frequency, Frequency),
    output_range: (Frequency, Frequency),
    vco_range: (Frequency, Frequency),
    pfd_range: (Frequency, Frequency),
}

impl Default for Ecp5Pll {
    fn default() -> Self {
        Self::new()
    }
}

impl Ecp5Pll {
    /// Creates a model with the datasheet frequency ranges.
    pub fn new() -> Self {
        Self {
            input_range: (Frequency::from_mhz(8.0), Frequency::from_mhz(400.0)),
            output_range: (Frequency::from_mhz(3.125), Frequency::from_mhz(400.0)),
            vco_range: (Frequency::from_mhz(400.0), Frequency::from_mhz(800.0)),
            pfd_range: (Frequency::from_mhz(3.125), Frequency::from_mhz(400.0)),
        }
    }

    /// Checks the request shape before searching.
    fn check_request(&self, input: Frequency, outputs: &[OutputRequest]) -> Result<(), PllError> {
        if outputs.is_empty() {
            return Err(PllError::NoOutputs);
        }
        if outputs.len() > OUTPUT_PORTS.len() {
            return Err(PllError::TooManyOutputs {
                requested: outputs.len(),
                max: OUTPUT_PORTS.len(),
            });
        }
        let (min, max) = self.input_range;
        if !in_range(input, self.input_range) {
            return Err(PllError::InputOutOfRange {
                frequency: input,
                min,
                max,
            });
        }
        for (index, out) in outputs.iter().enumerate() {
            let (min, max) = self.output_range;
            if !in_range(out.frequency, self.output_range) {
                return Err(PllError::OutputOutOfRange {
                    index,
                    frequency: out.frequency,
                    min,
                    max,
                });
            }
            if !out.phase.is_normalized() {
                return Err(PllError::PhaseOutOfRange {
                    index,
                    phase: out.phase,
                });
            }
        }
        Ok(())
    }

    /// Finds the first output divider reproducing `request` from `vco`.
    fn fit_output(vco: Frequency, index: usize, request: &OutputRequest) -> Option<OutputSetting> {
        DIV_RANGE.clone().find_map(|div| {
            let achieved = vco.divided_by(div);
            if !achieved.within(request.frequency, request.margin) {
                return None;
            }
            let (phase, cphase, fphase) = fit_phase(div, request.phase, request.margin)?;
            Some(OutputSetting {
                port: OUTPUT_PORTS[index],
                div,
                achieved,
                phase,
                cphase,
                fphase,
            })
        })
    }
}

/// Quantizes `phase` to the output's phase grid.
///
/// One output period spans `div` VCO periods of eight fine steps each. Returns
/// the reproduced phase with its CPHASE/FPHASE encoding, or `None` if the
/// quantization error exceeds `margin` of a full period.
fn fit_phase(div: u32, phase: Phase, margin: f64) -> Option<(Phase, u32, u32)> {
    let steps = div * FPHASE_STEPS;
    let step_deg = 360.0 / f64::from(steps);
    let total = (phase.as_degrees() / step_deg).round() as u32 % steps;
    let achieved = f64::from(total) * step_deg;
    // Distance around the circle: 359 degrees is one degree from 0.
    let err = (achieved - phase.as_degrees()).abs();
    let err = err.min(360.0 - err);
    if err > margin * 360.0 + PHASE_EPSILON {
        return None;
    }
    // CPHASE counts from DIV - 1, which is the zero-offset setting.
    let cphase = div - 1 + total / FPHASE_STEPS;
    let fphase = total % FPHASE_STEPS;
    Some((Phase::degrees(achieved), cphase, fphase))
}

fn in_range(f: Frequency, (min, max): (Frequency, Frequency)) -> bool {
    f >= min && f <= max
}

impl PllPrimitive for Ecp5Pll {
    fn name(&self) -> &str {
        "EHXPLLL"
    }

    fn max_outputs(&self) -> usize {
        OUTPUT_PORTS.len()
    }

    fn input_range(&self) -> (Frequency, Frequency) {
        self.input_range
    }

    fn output_range(&self) -> (Frequency, Frequency) {
        self.output_range
    }

    /// Exhaustive search: CLKI_DIV ascending, then CLKFB_DIV, then
    /// CLKOS3_DIV; the first VCO on which every output fits wins.
    fn solve(
        &self,
        input: Frequency,
        outputs: &[OutputRequest],
    ) -> Result<PllSolution, PllError> {
        self.check_request(input, outputs)?;

        for clki_div in DIV_RANGE {
            let pfd = input.divided_by(clki_div);
            if !in_range(pfd, self.pfd_range) {
                continue;
            }
            for clkfb_div in DIV_RANGE {
                // The feedback output runs at PFD * CLKFB_DIV whatever CLKOS3_DIV is.
                if !in_range(pfd.times(clkfb_div), self.output_range) {
                    break;
                }
                for feedback_div in DIV_RANGE {
                    let vco = input
                        .times(clkfb_div * feedback_div)
                        .divided_by(clki_div);
                    if vco > self.vco_range.1 {
                        break;
                    }
                    if vco < self.vco_range.0 {
                        continue;
                    }
                    let settings: Option<Vec<OutputSetting>> = outputs
                        .iter()
                        .enumerate()
                        .map(|(index, request)| Self::fit_output(vco, index, request))
                        .collect();
                    if let Some(outputs) = settings {
                        debug!(clki_div, clkfb_div, feedback_div, vco = %vco, "EHXPLLL solution found");
                        return Ok(PllSolution {
                            clki_div,
                            clkfb_div,
                            feedback_div,
                            vco,
                            outputs,
                        });
                    }
                    trace!(clki_div, clkfb_div, feedback_div, vco = %vco, "VCO rejected");
                }
            }
        }

        Err(PllError::NoSolution {
            input,
            outputs: outputs.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mhz(v: f64) -> Frequency {
        Frequency::from_mhz(v)
    }

    #[test]
    fn usb_rates_exact_from_crystal() {
        let pll = Ecp5Pll::new();
        let outputs = [
            OutputRequest::exact(mhz(12.0), Phase::ZERO),
            OutputRequest::exact(mhz(48.0), Phase::ZERO),
        ];
        let s = pll.solve(mhz(25.0), &outputs).unwrap();
        assert_eq!(s.outputs[0].achieved.hz(), 12_000_000.0);
        assert_eq!(s.outputs[1].achieved.hz(), 48_000_000.0);
        assert_eq!(s.vco, mhz(480.0));
        assert_eq!((s.clki_div, s.clkfb_div, s.feedback_div), (5, 1, 96));
    }

    #[test]
    fn feedback_output_stays_in_range() {
        let pll = Ecp5Pll::new();
        let (min, max) = pll.output_range();
        let cases = [
            (mhz(25.0), vec![OutputRequest::new(mhz(60.0), Phase::ZERO)]),
            (mhz(25.0), vec![OutputRequest::exact(mhz(400.0), Phase::ZERO)]),
            (mhz(62.0), vec![OutputRequest::new(mhz(60.0), Phase::HALF_CYCLE)]),
            (
                mhz(25.0),
                vec![
                    OutputRequest::exact(mhz(40.0), Phase::ZERO),
                    OutputRequest::exact(mhz(200.0), Phase::ZERO),
                ],
            ),
        ];
        for (input, outputs) in cases {
            let s = pll.solve(input, &outputs).unwrap();
            let feedback = s.feedback();
            assert!(feedback >= min && feedback <= max, "feedback {feedback} for {input}");
            // Loop lock: VCO / CLKOS3_DIV / CLKFB_DIV equals the PFD.
            assert_eq!(
                feedback.divided_by(s.clkfb_div),
                input.divided_by(s.clki_div)
            );
        }
    }

    #[test]
    fn video_rates_exact_from_crystal() {
        let pll = Ecp5Pll::new();
        let outputs = [
            OutputRequest::exact(mhz(40.0), Phase::ZERO),
            OutputRequest::exact(mhz(200.0), Phase::ZERO),
        ];
        let s = pll.solve(mhz(25.0), &outputs).unwrap();
        assert_eq!(s.outputs[0].achieved, mhz(40.0));
        assert_eq!(s.outputs[1].achieved, mhz(200.0));
        assert_eq!(s.outputs[0].port, "CLKOP");
        assert_eq!(s.outputs[1].port, "CLKOS");
    }

    #[test]
    fn half_cycle_phase_encoding() {
        let pll = Ecp5Pll::new();
        let outputs = [
            OutputRequest::new(mhz(60.0), Phase::ZERO),
            OutputRequest::new(mhz(60.0), Phase::HALF_CYCLE),
        ];
        let s = pll.solve(mhz(25.0), &outputs).unwrap();
        assert_eq!(s.vco, mhz(600.0));
        let shifted = &s.outputs[1];
        assert_eq!(shifted.div, 10);
        assert_eq!(shifted.phase, Phase::HALF_CYCLE);
        // 180 degrees of a 10-period output is 5 VCO periods past the DIV-1 bias.
        assert_eq!((shifted.cphase, shifted.fphase), (14, 0));
        assert_eq!((s.outputs[0].cphase, s.outputs[0].fphase), (9, 0));
    }

    #[test]
    fn fine_phase_used_for_odd_divider() {
        let (phase, cphase, fphase) = fit_phase(5, Phase::HALF_CYCLE, 0.0).unwrap();
        assert_eq!(phase, Phase::HALF_CYCLE);
        assert_eq!((cphase, fphase), (4 + 2, 4));
    }

    #[test]
    fn unreachable_phase_rejected_at_zero_margin() {
        assert!(fit_phase(1, Phase::degrees(10.0), 0.0).is_none());
        assert!(fit_phase(1, Phase::degrees(45.0), 0.0).is_some());
    }

    #[test]
    fn phase_wraps_around_full_cycle() {
        let (phase, cphase, fphase) = fit_phase(1, Phase::degrees(359.0), 0.01).unwrap();
        assert_eq!(phase, Phase::ZERO);
        assert_eq!((cphase, fphase), (0, 0));
        assert!(fit_phase(1, Phase::degrees(359.0), 0.0).is_none());

        let outputs = [OutputRequest {
            frequency: mhz(400.0),
            phase: Phase::degrees(359.0),
            margin: 0.01,
        }];
        let s = Ecp5Pll::new().solve(mhz(25.0), &outputs).unwrap();
        assert_eq!(s.outputs[0].achieved, mhz(400.0));
        assert_eq!(s.outputs[0].phase, Phase::ZERO);
    }

    #[test]
    fn deterministic() {
        let pll = Ecp5Pll::new();
        let outputs = [OutputRequest::new(mhz(60.0), Phase::ZERO)];
        assert_eq!(
            pll.solve(mhz(62.0), &outputs).unwrap(),
            pll.solve(mhz(62.0), &outputs).unwrap()
        );
    }

    #[test]
    fn no_solution_for_exact_odd_rate() {
        let pll = Ecp5Pll::new();
        let outputs = [OutputRequest::exact(Frequency::new(33_333_333.0), Phase::ZERO)];
        let err = pll.solve(mhz(25.0), &outputs).unwrap_err();
        assert!(matches!(err, PllError::NoSolution { outputs: 1, .. }));
    }

    #[test]
    fn too_many_outputs() {
        let pll = Ecp5Pll::new();
        let outputs = [OutputRequest::new(mhz(50.0), Phase::ZERO); 4];
        let err = pll.solve(mhz(25.0), &outputs).unwrap_err();
        assert_eq!(
            err,
            PllError::TooManyOutputs {
                requested: 4,
                max: 3
            }
        );
    }

    #[test]
    fn no_outputs() {
        assert_eq!(
            Ecp5Pll::new().solve(mhz(25.0), &[]).unwrap_err(),
            PllError::NoOutputs
        );
    }

    #[test]
    fn input_out_of_range() {
        let outputs = [OutputRequest::new(mhz(50.0), Phase::ZERO)];
        let err = Ecp5Pll::new().solve(mhz(2.0), &outputs).unwrap_err();
        assert!(matches!(err, PllError::InputOutOfRange { .. }));
    }

    #[test]
    fn output_out_of_range() {
        let outputs = [
            OutputRequest::new(mhz(50.0), Phase::ZERO),
            OutputRequest::new(mhz(450.0), Phase::ZERO),
        ];
        let err = Ecp5Pll::new().solve(mhz(25.0), &outputs).unwrap_err();
        assert!(matches!(err, PllError::OutputOutOfRange { index: 1, .. }));
    }

    #[test]
    fn phase_out_of_range() {
        let outputs = [OutputRequest::new(mhz(50.0), Phase::degrees(360.0))];
        let err = Ecp5Pll::new().solve(mhz(25.0), &outputs).unwrap_err();
        assert!(matches!(err, PllError::PhaseOutOfRange { index: 0, .. }));
    }
}
