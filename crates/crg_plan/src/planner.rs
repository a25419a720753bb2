//! The PLL planner: from root source and flags to PLLs and domains.
//!
//! The primary PLL always carries the system domain plus the SDRAM-adjacent
//! domains for the selected rate. USB and video each get a PLL of their own,
//! so their exact-rate requirements never constrain the primary dividers.

use crate::domain::{
    ClockDomain, SYSTEM, SYSTEM_DOUBLE_RATE, SYSTEM_DOUBLE_RATE_PHASE_SHIFTED,
    SYSTEM_PHASE_SHIFTED, USB_12, USB_48, VIDEO_PIXEL, VIDEO_SERIALIZER,
};
use crate::error::PlanError;
use crate::ids::PllId;
use crate::pll::{PllBuilder, PllInstance, PllRole};
use crate::registry::{DomainRegistry, RegistryBuilder};
use crate::reset::ResetCondition;
use crate::source::ClockSource;
use crg_common::{Frequency, Phase};
use crg_config::{CrgFlags, SdramRate};
use crg_pll::{PllPrimitive, DEFAULT_MARGIN};
use std::sync::Arc;
use tracing::info;

/// Phase of the clock driven to the SDRAM pin, relative to the domain it samples with.
///
/// Found empirically on the Colorlight boards: 180 degrees gives the SDRAM
/// clock-to-data margin the PHY needs. Do not change without re-validating
/// board timing.
pub const SDRAM_CLOCK_PHASE: Phase = Phase::HALF_CYCLE;

/// USB full-speed bit clock.
pub const USB_12_HZ: f64 = 12_000_000.0;
/// USB PHY sampling clock.
pub const USB_48_HZ: f64 = 48_000_000.0;
/// Video pixel clock (800x600 at 60 Hz).
pub const VIDEO_PIXEL_HZ: f64 = 40_000_000.0;
/// Serializer clock as a multiple of the pixel clock.
pub const VIDEO_SERIALIZER_RATIO: u32 = 5;

/// Margin for rates with no slack (USB and video).
const EXACT: f64 = 0.0;

/// The output of one planning pass.
#[derive(Debug, Clone)]
pub struct ClockPlan {
    /// Every allocated PLL, primary first.
    pub plls: Vec<PllInstance>,
    /// The realized domains.
    pub registry: DomainRegistry,
}

/// Plans PLL allocations and domains for one primitive family.
#[derive(Debug)]
pub struct PllPlanner<'a> {
    primitive: &'a dyn PllPrimitive,
}

impl<'a> PllPlanner<'a> {
    /// Creates a planner targeting `primitive`.
    pub fn new(primitive: &'a dyn PllPrimitive) -> Self {
        Self { primitive }
    }

    /// Runs one planning pass.
    ///
    /// Either returns a fully populated plan or an error; nothing is shared
    /// until the pass completes. Every PLL receives `reset` by reference.
    ///
    /// # Errors
    ///
    /// - [`PlanError::Configuration`] for a non-positive system frequency or
    ///   a source the primitive cannot take as input.
    /// - [`PlanError::InfeasibleDomain`] naming the first domain that cannot
    ///   be produced within its margin.
    pub fn plan(
        &self,
        flags: &CrgFlags,
        source: &Arc<ClockSource>,
        reset: &Arc<ResetCondition>,
    ) -> Result<ClockPlan, PlanError> {
        let sys = flags.sys_clk_freq;
        if !sys.is_positive() {
            return Err(PlanError::configuration(
                "clocks.sys_clk_freq",
                format!("system frequency must be positive, got {sys}"),
            ));
        }

        let mut allocator = Allocator::new(self.primitive, source, reset);

        let mut primary = allocator.allocate(PllRole::Primary)?;
        primary.create_output(SYSTEM, sys, Phase::ZERO, DEFAULT_MARGIN)?;
        match flags.sdram_rate {
            SdramRate::Full => {
                primary.create_output(
                    SYSTEM_PHASE_SHIFTED,
                    sys,
                    SDRAM_CLOCK_PHASE,
                    DEFAULT_MARGIN,
                )?;
            }
            SdramRate::Half => {
                let double = sys.times(2);
                primary.create_output(SYSTEM_DOUBLE_RATE, double, Phase::ZERO, DEFAULT_MARGIN)?;
                primary.create_output(
                    SYSTEM_DOUBLE_RATE_PHASE_SHIFTED,
                    double,
                    SDRAM_CLOCK_PHASE,
                    DEFAULT_MARGIN,
                )?;
            }
        }
        allocator.commit(primary)?;

        if flags.enable_usb_pll {
            let mut usb = allocator.allocate(PllRole::Usb)?;
            usb.create_output(USB_12, Frequency::new(USB_12_HZ), Phase::ZERO, EXACT)?;
            usb.create_output(USB_48, Frequency::new(USB_48_HZ), Phase::ZERO, EXACT)?;
            allocator.commit(usb)?;
        }

        if flags.enable_video_pll {
            let pixel = Frequency::new(VIDEO_PIXEL_HZ);
            let mut video = allocator.allocate(PllRole::Video)?;
            video.create_output(VIDEO_PIXEL, pixel, Phase::ZERO, EXACT)?;
            video.create_output(
                VIDEO_SERIALIZER,
                pixel.times(VIDEO_SERIALIZER_RATIO),
                Phase::ZERO,
                EXACT,
            )?;
            allocator.commit(video)?;
        }

        let (plls, domains) = allocator.into_parts();
        let mut registry = RegistryBuilder::new();
        for domain in domains {
            registry.insert(domain)?;
        }
        let registry = registry.finalize(flags.sdram_rate, &plls)?;

        info!(
            plls = plls.len(),
            domains = registry.len(),
            sdram_rate = %flags.sdram_rate,
            "clock plan complete"
        );
        Ok(ClockPlan { plls, registry })
    }
}

/// Hands out PLL IDs in order and collects finished PLLs.
struct Allocator<'a> {
    primitive: &'a dyn PllPrimitive,
    source: &'a Arc<ClockSource>,
    reset: &'a Arc<ResetCondition>,
    plls: Vec<PllInstance>,
    domains: Vec<ClockDomain>,
}

impl<'a> Allocator<'a> {
    fn new(
        primitive: &'a dyn PllPrimitive,
        source: &'a Arc<ClockSource>,
        reset: &'a Arc<ResetCondition>,
    ) -> Self {
        Self {
            primitive,
            source,
            reset,
            plls: Vec::new(),
            domains: Vec::new(),
        }
    }

    fn allocate(&self, role: PllRole) -> Result<PllBuilder<'a>, PlanError> {
        let id = PllId::from_raw(self.plls.len() as u32);
        PllBuilder::register_input(
            id,
            role,
            self.primitive,
            self.source,
            Arc::clone(self.reset),
        )
    }

    fn commit(&mut self, builder: PllBuilder<'a>) -> Result<(), PlanError> {
        let (instance, domains) = builder.finish()?;
        self.plls.push(instance);
        self.domains.extend(domains);
        Ok(())
    }

    fn into_parts(self) -> (Vec<PllInstance>, Vec<ClockDomain>) {
        (self.plls, self.domains)
    }
}
