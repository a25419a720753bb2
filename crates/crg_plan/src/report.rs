//! Serializable summary of a topology, for display and fingerprinting.

use crate::topology::{BoardInfo, ClockTopology};
use crg_common::{ContentHash, CrgResult, Frequency, InternalError, Phase};
use crg_config::CrgFlags;
use serde::Serialize;
use std::fmt;

/// Everything a reader needs to check a topology, without shared handles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyReport {
    /// Target board.
    pub board: BoardInfo,
    /// Flags the topology was planned from.
    pub flags: CrgFlags,
    /// Root source signal and frequency.
    pub source: SourceReport,
    /// The shared reset expression.
    pub reset: String,
    /// One entry per PLL, in allocation order.
    pub plls: Vec<PllReport>,
    /// One entry per domain, sorted by name.
    pub domains: Vec<DomainReport>,
    /// The SDRAM clock forward.
    pub sdram_clock: SdramClockReport,
}

/// Root source summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    /// Source signal name.
    pub signal: String,
    /// Source frequency.
    pub frequency: Frequency,
    /// Whether the on-chip oscillator is used.
    pub internal: bool,
}

/// PLL summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PllReport {
    /// PLL ID (e.g., "pll0").
    pub id: String,
    /// PLL role.
    pub role: String,
    /// Primitive cell name.
    pub primitive: String,
    /// Reference divider.
    pub clki_div: u32,
    /// Feedback divider.
    pub clkfb_div: u32,
    /// Divider on the output closing the feedback loop.
    pub feedback_div: u32,
    /// VCO frequency.
    pub vco: Frequency,
    /// Outputs in port order.
    pub outputs: Vec<PllOutputReport>,
}

/// One PLL output port.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PllOutputReport {
    /// Domain driven by the port.
    pub domain: String,
    /// Primitive port name.
    pub port: String,
    /// Output divider.
    pub div: u32,
    /// Coarse phase setting.
    pub cphase: u32,
    /// Fine phase setting.
    pub fphase: u32,
}

/// Domain summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainReport {
    /// Domain name.
    pub name: String,
    /// Owning PLL.
    pub pll: String,
    /// Requested frequency.
    pub frequency: Frequency,
    /// Requested phase.
    pub phase: Phase,
    /// Frequency produced.
    pub achieved_frequency: Frequency,
    /// Phase produced.
    pub achieved_phase: Phase,
}

/// SDRAM clock summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SdramClockReport {
    /// Domain forwarded to the pin.
    pub domain: String,
    /// Output cell name.
    pub primitive: String,
    /// Pin name.
    pub pin: String,
    /// Package site.
    pub site: String,
}

impl ClockTopology {
    /// Summarizes the topology.
    pub fn report(&self) -> TopologyReport {
        let plls = self
            .plls
            .iter()
            .map(|pll| PllReport {
                id: pll.id.to_string(),
                role: pll.role.to_string(),
                primitive: pll.primitive.clone(),
                clki_div: pll.solution.clki_div,
                clkfb_div: pll.solution.clkfb_div,
                feedback_div: pll.solution.feedback_div,
                vco: pll.solution.vco,
                outputs: pll
                    .outputs
                    .iter()
                    .zip(&pll.solution.outputs)
                    .map(|(domain, setting)| PllOutputReport {
                        domain: domain.clone(),
                        port: setting.port.to_string(),
                        div: setting.div,
                        cphase: setting.cphase,
                        fphase: setting.fphase,
                    })
                    .collect(),
            })
            .collect();
        let domains = self
            .registry
            .enumerate()
            .map(|d| DomainReport {
                name: d.name.clone(),
                pll: d.pll.to_string(),
                frequency: d.frequency,
                phase: d.phase,
                achieved_frequency: d.achieved_frequency,
                achieved_phase: d.achieved_phase,
            })
            .collect();
        TopologyReport {
            board: self.board.clone(),
            flags: self.flags,
            source: SourceReport {
                signal: self.source.signal_name().to_string(),
                frequency: self.source.frequency,
                internal: self.source.is_internal(),
            },
            reset: self.reset.expression(),
            plls,
            domains,
            sdram_clock: SdramClockReport {
                domain: self.sdram_clock.domain.clone(),
                primitive: self.sdram_clock.primitive.clone(),
                pin: self.sdram_clock.pin.name.clone(),
                site: self.sdram_clock.pin.site.clone(),
            },
        }
    }

    /// Hashes the report. Equal inputs give equal fingerprints.
    pub fn fingerprint(&self) -> CrgResult<ContentHash> {
        let bytes = serde_json::to_vec(&self.report())
            .map_err(|e| InternalError::new(format!("failed to serialize report: {e}")))?;
        Ok(ContentHash::from_bytes(&bytes))
    }
}

impl fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "board:   {} rev {} ({})",
            self.board.name, self.board.revision, self.board.device
        )?;
        writeln!(
            f,
            "source:  {} {}{}",
            self.source.signal,
            self.source.frequency,
            if self.source.internal { " (internal)" } else { "" }
        )?;
        writeln!(f, "reset:   {}", self.reset)?;
        writeln!(f, "sdram:   {}", self.flags.sdram_rate)?;
        for pll in &self.plls {
            writeln!(
                f,
                "{} {} ({}): CLKI_DIV={} CLKFB_DIV={} FEEDBACK_DIV={} VCO={}",
                pll.id,
                pll.role,
                pll.primitive,
                pll.clki_div,
                pll.clkfb_div,
                pll.feedback_div,
                pll.vco
            )?;
            for out in &pll.outputs {
                writeln!(
                    f,
                    "  {:<7} {:<34} DIV={:<3} CPHASE={:<3} FPHASE={}",
                    out.port, out.domain, out.div, out.cphase, out.fphase
                )?;
            }
        }
        writeln!(f, "domains:")?;
        for d in &self.domains {
            writeln!(
                f,
                "  {:<34} {:>12} {:>8}  {}",
                d.name, d.achieved_frequency, d.achieved_phase, d.pll
            )?;
        }
        write!(
            f,
            "sdram clock: {} -> {}@{} via {}",
            self.sdram_clock.domain,
            self.sdram_clock.pin,
            self.sdram_clock.site,
            self.sdram_clock.primitive
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::topology::build_topology;
    use crg_board::load_board;
    use crg_config::{CrgFlags, SdramRate};
    use crg_pll::Ecp5Pll;

    #[test]
    fn report_lists_every_domain() {
        let board = load_board("i5", "7.0").unwrap();
        let flags = CrgFlags {
            enable_usb_pll: true,
            ..CrgFlags::default()
        };
        let topo = build_topology(&flags, board.as_ref(), &Ecp5Pll::new()).unwrap();
        let report = topo.report();
        let names: Vec<_> = report.domains.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["system", "system-phase-shifted", "usb-12", "usb-48"]);
        assert_eq!(report.plls[1].id, "pll1");
        assert_eq!(report.reset, "~cpu_reset_n | soft_reset");
    }

    #[test]
    fn text_report_mentions_plls_and_pin() {
        let board = load_board("i5", "7.0").unwrap();
        let topo = build_topology(&CrgFlags::default(), board.as_ref(), &Ecp5Pll::new()).unwrap();
        let text = topo.report().to_string();
        assert!(text.contains("pll0 primary (EHXPLLL)"));
        assert!(text.contains("CLKI_DIV=1 CLKFB_DIV=1 FEEDBACK_DIV=24 VCO=600MHz"));
        assert!(text.contains("sdram_clock@B9 via ODDRX1F"));
    }

    #[test]
    fn report_serializes_to_json() {
        let board = load_board("i5", "7.0").unwrap();
        let topo = build_topology(&CrgFlags::default(), board.as_ref(), &Ecp5Pll::new()).unwrap();
        let json = serde_json::to_value(topo.report()).unwrap();
        assert_eq!(json["board"]["name"], "i5");
        assert_eq!(json["flags"]["sdram_rate"], "1:1");
        assert_eq!(json["plls"][0]["outputs"][1]["cphase"], 14);
        assert_eq!(json["plls"][0]["feedback_div"], 24);
    }

    #[test]
    fn fingerprint_tracks_flags() {
        let board = load_board("i5", "7.0").unwrap();
        let pll = Ecp5Pll::new();
        let a = build_topology(&CrgFlags::default(), board.as_ref(), &pll).unwrap();
        let b = build_topology(&CrgFlags::default(), board.as_ref(), &pll).unwrap();
        let half = CrgFlags {
            sdram_rate: SdramRate::Half,
            ..CrgFlags::default()
        };
        let c = build_topology(&half, board.as_ref(), &pll).unwrap();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_ne!(a.fingerprint().unwrap(), c.fingerprint().unwrap());
    }
}
