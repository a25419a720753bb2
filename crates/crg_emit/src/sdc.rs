//! SDC clock constraints.
//!
//! One `create_clock` per clock: the root source on its port, then every
//! domain on its net. A domain's waveform is shifted by its phase.

use crg_common::{Frequency, Phase};
use crg_plan::ClockTopology;

/// Renders `create_clock` constraints for the source and every domain.
pub fn render_sdc(topo: &ClockTopology) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# Clock constraints for {} rev {}.\n",
        topo.board.name, topo.board.revision
    ));

    let source = topo.source.signal_name();
    let target = if topo.source.is_internal() {
        format!("[get_nets {source}]")
    } else {
        format!("[get_ports {source}]")
    };
    push_clock(&mut out, source, topo.source.frequency, Phase::ZERO, &target);

    for domain in topo.registry.enumerate() {
        let net = format!("[get_nets {}_clk]", domain.signal_name());
        push_clock(
            &mut out,
            &domain.name,
            domain.achieved_frequency,
            domain.achieved_phase,
            &net,
        );
    }
    out
}

fn push_clock(out: &mut String, name: &str, freq: Frequency, phase: Phase, target: &str) {
    let period = freq.period_ns();
    let rise = phase.delay_ns(period);
    let fall = rise + period / 2.0;
    out.push_str(&format!(
        "create_clock -period {period:.3} -name {name} -waveform {{{rise:.3} {fall:.3}}} {target}\n"
    ));
}
