//! PLL allocations and the per-PLL output builder.

use crate::domain::ClockDomain;
use crate::error::PlanError;
use crate::ids::PllId;
use crate::reset::{ResetCondition, ResetInputs};
use crate::source::ClockSource;
use crg_common::{Frequency, InternalError, Phase};
use crg_pll::{OutputRequest, PllError, PllPrimitive, PllSolution};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// What a PLL is allocated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PllRole {
    /// Drives the system domain and the SDRAM-adjacent domains.
    Primary,
    /// Drives the USB domains.
    Usb,
    /// Drives the video domains.
    Video,
}

impl fmt::Display for PllRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primary => "primary",
            Self::Usb => "usb",
            Self::Video => "video",
        })
    }
}

/// A physical PLL allocation with its solved dividers.
///
/// All outputs share the same input reference and the same reset condition.
#[derive(Debug, Clone)]
pub struct PllInstance {
    /// Allocation index.
    pub id: PllId,
    /// Why the PLL exists.
    pub role: PllRole,
    /// Primitive cell name.
    pub primitive: String,
    /// Input reference.
    pub input: Arc<ClockSource>,
    /// The shared reset condition.
    pub reset: Arc<ResetCondition>,
    /// Divider solution covering every output.
    pub solution: PllSolution,
    /// Output domain names, in primitive output order. Never empty.
    pub outputs: Vec<String>,
}

impl PllInstance {
    /// Returns `true` for the PLL that drives the system domain.
    pub fn is_primary(&self) -> bool {
        self.role == PllRole::Primary
    }

    /// Returns `true` if this PLL is held in reset for the given inputs.
    pub fn in_reset(&self, inputs: ResetInputs) -> bool {
        self.reset.asserted(inputs)
    }
}

/// Accumulates output requests for one PLL, re-solving after each one.
///
/// Re-solving on every request attributes infeasibility to the domain whose
/// addition made the set unsolvable.
pub(crate) struct PllBuilder<'a> {
    id: PllId,
    role: PllRole,
    primitive: &'a dyn PllPrimitive,
    input: Arc<ClockSource>,
    reset: Arc<ResetCondition>,
    names: Vec<String>,
    requests: Vec<OutputRequest>,
    solution: Option<PllSolution>,
}

impl<'a> PllBuilder<'a> {
    /// Allocates a PLL bound to `input`, checking that the primitive accepts it.
    pub(crate) fn register_input(
        id: PllId,
        role: PllRole,
        primitive: &'a dyn PllPrimitive,
        input: &Arc<ClockSource>,
        reset: Arc<ResetCondition>,
    ) -> Result<Self, PlanError> {
        if !primitive.accepts_input(input.frequency) {
            let (min, max) = primitive.input_range();
            let flag = if input.is_internal() {
                "clocks.osc_divider"
            } else {
                "board"
            };
            return Err(PlanError::configuration(
                flag,
                format!(
                    "{} input {} of {id} is outside {min}..{max}",
                    primitive.name(),
                    input.frequency
                ),
            ));
        }
        Ok(Self {
            id,
            role,
            primitive,
            input: Arc::clone(input),
            reset,
            names: Vec::new(),
            requests: Vec::new(),
            solution: None,
        })
    }

    /// Adds an output and checks the accumulated set is still feasible.
    pub(crate) fn create_output(
        &mut self,
        name: &str,
        frequency: Frequency,
        phase: Phase,
        margin: f64,
    ) -> Result<(), PlanError> {
        let request = OutputRequest {
            frequency,
            phase,
            margin,
        };
        if let Err(reason) = self.check_capacity(frequency) {
            return Err(self.infeasible(name, request, reason));
        }
        self.requests.push(request);
        match self.primitive.solve(self.input.frequency, &self.requests) {
            Ok(solution) => {
                debug!(
                    pll = %self.id,
                    domain = name,
                    frequency = %frequency,
                    phase = %phase,
                    "output accepted"
                );
                self.names.push(name.to_string());
                self.solution = Some(solution);
                Ok(())
            }
            Err(reason) => {
                self.requests.pop();
                Err(self.infeasible(name, request, reason))
            }
        }
    }

    /// Rejects an output the primitive has no port or range for, before any
    /// divider search.
    fn check_capacity(&self, frequency: Frequency) -> Result<(), PllError> {
        let max = self.primitive.max_outputs();
        if self.requests.len() >= max {
            return Err(PllError::TooManyOutputs {
                requested: self.requests.len() + 1,
                max,
            });
        }
        let (min, max) = self.primitive.output_range();
        if frequency < min || frequency > max {
            return Err(PllError::OutputOutOfRange {
                index: self.requests.len(),
                frequency,
                min,
                max,
            });
        }
        Ok(())
    }

    fn infeasible(&self, name: &str, request: OutputRequest, reason: PllError) -> PlanError {
        PlanError::InfeasibleDomain {
            domain: name.to_string(),
            frequency: request.frequency,
            phase: request.phase,
            margin: request.margin,
            pll: self.id,
            role: self.role,
            reason,
        }
    }

    /// Freezes the PLL and produces its domains.
    pub(crate) fn finish(self) -> Result<(PllInstance, Vec<ClockDomain>), PlanError> {
        let solution = self.solution.ok_or_else(|| {
            InternalError::new(format!("{} ({}) has no outputs", self.id, self.role))
        })?;
        let domains = self
            .names
            .iter()
            .zip(&self.requests)
            .zip(&solution.outputs)
            .map(|((name, request), setting)| ClockDomain {
                name: name.clone(),
                pll: self.id,
                frequency: request.frequency,
                phase: request.phase,
                margin: request.margin,
                achieved_frequency: setting.achieved,
                achieved_phase: setting.phase,
            })
            .collect();
        let instance = PllInstance {
            id: self.id,
            role: self.role,
            primitive: self.primitive.name().to_string(),
            input: self.input,
            reset: self.reset,
            solution,
            outputs: self.names,
        };
        Ok((instance, domains))
    }
}
