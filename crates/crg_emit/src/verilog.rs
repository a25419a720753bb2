//! Verilog netlist for the clock/reset generator.
//!
//! The generated `crg` module instantiates the oscillator (if used), every
//! `EHXPLLL`, one reset synchronizer per domain and the `ODDRX1F` that
//! forwards the SDRAM clock. All PLL `RST` pins are driven by the same
//! `crg_reset` wire.

use crg_plan::{ClockTopology, PllInstance, SourceKind};

/// Name of the wire carrying the shared reset condition.
pub const RESET_WIRE: &str = "crg_reset";

/// Renders the topology as a Verilog module named `crg`.
pub fn render_verilog(topo: &ClockTopology) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "// Clock/reset generator for {} rev {} ({}).\n// Generated by crg; do not edit.\n\n",
        topo.board.name, topo.board.revision, topo.board.device
    ));

    out.push_str("module crg (\n");
    let mut ports = Vec::new();
    if let SourceKind::ExternalPin { pin } = &topo.source.kind {
        ports.push(format!("    input  wire {}", pin.name));
    }
    ports.push(format!("    input  wire {}", topo.reset.external.name));
    ports.push(format!("    input  wire {}", topo.reset.soft_reset));
    ports.push(format!("    output wire {}", topo.sdram_clock.pin.name));
    for pll in &topo.plls {
        for domain in &pll.outputs {
            let signal = domain.replace('-', "_");
            ports.push(format!("    output wire {signal}_clk"));
            ports.push(format!("    output wire {signal}_rst"));
        }
    }
    out.push_str(&ports.join(",\n"));
    out.push_str("\n);\n\n");

    out.push_str(&format!(
        "wire {RESET_WIRE} = {};\n\n",
        topo.reset.expression()
    ));

    if let SourceKind::InternalOscillator { divider } = &topo.source.kind {
        let osc = topo.source.signal_name();
        out.push_str(&format!("wire {osc};\n"));
        out.push_str(&format!(
            "OSCG #(\n    .DIV({divider})\n) oscg (\n    .OSC({osc})\n);\n\n"
        ));
    }

    for pll in &topo.plls {
        render_pll(&mut out, pll, topo.source.signal_name());
    }

    let sdram = &topo.sdram_clock;
    out.push_str(&format!(
        "// {} forwarded to the SDRAM clock pin.\n",
        sdram.domain
    ));
    out.push_str(&format!(
        "{} sdram_clock_oddr (\n    .SCLK({}_clk),\n    .RST(1'b0),\n    .D0(1'b{}),\n    .D1(1'b{}),\n    .Q({})\n);\n\n",
        sdram.primitive,
        sdram.domain.replace('-', "_"),
        u8::from(sdram.d0),
        u8::from(sdram.d1),
        sdram.pin.name
    ));

    out.push_str("endmodule\n");
    out
}

fn render_pll(out: &mut String, pll: &PllInstance, input: &str) {
    let id = pll.id;
    let s = &pll.solution;
    out.push_str(&format!(
        "// {id} ({}): VCO {}\nwire {id}_clkfb;\nwire {id}_locked;\n",
        pll.role, s.vco
    ));

    let mut params = vec![
        "    .PLLRST_ENA(\"ENABLED\")".to_string(),
        "    .INTFB_WAKE(\"DISABLED\")".to_string(),
        "    .STDBY_ENABLE(\"DISABLED\")".to_string(),
        "    .DPHASE_SOURCE(\"DISABLED\")".to_string(),
        format!("    .CLKI_DIV({})", s.clki_div),
        format!("    .CLKFB_DIV({})", s.clkfb_div),
        "    .FEEDBK_PATH(\"INT_OS3\")".to_string(),
        "    .CLKOS3_ENABLE(\"ENABLED\")".to_string(),
        format!("    .CLKOS3_DIV({})", s.feedback_div),
        format!("    .CLKOS3_CPHASE({})", s.feedback_div - 1),
        "    .CLKOS3_FPHASE(0)".to_string(),
    ];
    for setting in &s.outputs {
        let port = setting.port;
        params.push(format!("    .{port}_ENABLE(\"ENABLED\")"));
        params.push(format!("    .{port}_DIV({})", setting.div));
        params.push(format!("    .{port}_CPHASE({})", setting.cphase));
        params.push(format!("    .{port}_FPHASE({})", setting.fphase));
    }

    let mut pins = vec![
        format!("    .RST({RESET_WIRE})"),
        "    .STDBY(1'b0)".to_string(),
        format!("    .CLKI({input})"),
        format!("    .CLKFB({id}_clkfb)"),
        format!("    .CLKINTFB({id}_clkfb)"),
    ];
    for (domain, setting) in pll.outputs.iter().zip(&s.outputs) {
        pins.push(format!("    .{}({}_clk)", setting.port, domain.replace('-', "_")));
    }
    pins.push(format!("    .LOCK({id}_locked)"));

    out.push_str(&format!(
        "{} #(\n{}\n) {id} (\n{}\n);\n\n",
        pll.primitive,
        params.join(",\n"),
        pins.join(",\n")
    ));

    // Domains leave reset two cycles after the PLL locks and the shared
    // condition is released.
    out.push_str(&format!(
        "wire {id}_reset = {RESET_WIRE} | ~{id}_locked;\n"
    ));
    for domain in &pll.outputs {
        let sig = domain.replace('-', "_");
        out.push_str(&format!(
            "reg [1:0] {sig}_rst_sync = 2'b11;\n\
             always @(posedge {sig}_clk or posedge {id}_reset)\n\
             \x20   if ({id}_reset) {sig}_rst_sync <= 2'b11;\n\
             \x20   else {sig}_rst_sync <= {{{sig}_rst_sync[0], 1'b0}};\n\
             assign {sig}_rst = {sig}_rst_sync[1];\n"
        ));
    }
    out.push('\n');
}
