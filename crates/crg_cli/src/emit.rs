//! `crg emit`: write the generated Verilog and constraints.

use std::path::Path;

use crate::pipeline::plan_topology;
use crate::{EmitArgs, GlobalArgs};

/// Runs the `crg emit` command.
pub fn run(args: &EmitArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let topology = plan_topology(global, &args.overrides)?;
    let written = crg_emit::write_outputs(&topology, Path::new(&args.output_dir))?;

    if !global.quiet {
        for path in &written {
            eprintln!("    Wrote {}", path.display());
        }
        eprintln!(
            "    Finished {} domain(s) on {} PLL(s) [{}]",
            topology.registry.len(),
            topology.plls.len(),
            topology.fingerprint()?.short()
        );
    }
    Ok(0)
}
