//! Lattice LPF pin constraints.

use crg_board::PinHandle;
use crg_plan::{ClockTopology, SourceKind};

/// Renders `LOCATE`/`IOBUF` for every pin the topology uses and a
/// `FREQUENCY PORT` for the external clock input.
pub fn render_lpf(topo: &ClockTopology) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# Pin constraints for {} rev {} ({}).\n",
        topo.board.name, topo.board.revision, topo.board.device
    ));

    if let SourceKind::ExternalPin { pin } = &topo.source.kind {
        push_pin(&mut out, pin);
        out.push_str(&format!(
            "FREQUENCY PORT \"{}\" {:.6} MHZ;\n",
            pin.name,
            topo.source.frequency.mhz()
        ));
    }
    push_pin(&mut out, &topo.reset.external);
    push_pin(&mut out, &topo.sdram_clock.pin);
    out
}

fn push_pin(out: &mut String, pin: &PinHandle) {
    out.push_str(&format!(
        "LOCATE COMP \"{}\" SITE \"{}\";\nIOBUF PORT \"{}\" IO_TYPE={};\n",
        pin.name, pin.site, pin.name, pin.io_standard
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crg_board::load_board;
    use crg_config::CrgFlags;
    use crg_plan::build_topology;
    use crg_pll::Ecp5Pll;

    #[test]
    fn crystal_pins() {
        let board = load_board("i5", "7.0").unwrap();
        let topo = build_topology(&CrgFlags::default(), board.as_ref(), &Ecp5Pll::new()).unwrap();
        let lpf = render_lpf(&topo);
        assert!(lpf.contains("LOCATE COMP \"clk25\" SITE \"P3\";"));
        assert!(lpf.contains("IOBUF PORT \"clk25\" IO_TYPE=LVCMOS33;"));
        assert!(lpf.contains("FREQUENCY PORT \"clk25\" 25.000000 MHZ;"));
        assert!(lpf.contains("LOCATE COMP \"cpu_reset_n\" SITE \"K18\";"));
        assert!(lpf.contains("LOCATE COMP \"sdram_clock\" SITE \"B9\";"));
    }

    #[test]
    fn internal_oscillator_has_no_clock_pin() {
        let board = load_board("i9", "7.2").unwrap();
        let flags = CrgFlags {
            use_internal_osc: true,
            ..CrgFlags::default()
        };
        let topo = build_topology(&flags, board.as_ref(), &Ecp5Pll::new()).unwrap();
        let lpf = render_lpf(&topo);
        assert!(!lpf.contains("FREQUENCY PORT"));
        assert!(!lpf.contains("clk25"));
        assert_eq!(lpf.matches("LOCATE COMP").count(), 2);
    }
}
