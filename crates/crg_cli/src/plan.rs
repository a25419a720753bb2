//! `crg plan`: print the planned topology.

use crate::pipeline::plan_topology;
use crate::{GlobalArgs, PlanArgs, ReportFormat};

/// Runs the `crg plan` command.
///
/// Prints the topology report to stdout in the requested format, followed by
/// its fingerprint in text mode.
pub fn run(args: &PlanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let topology = plan_topology(global, &args.overrides)?;
    let report = topology.report();

    match args.format {
        ReportFormat::Text => {
            println!("{report}");
            println!("fingerprint: {}", topology.fingerprint()?);
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(0)
}
