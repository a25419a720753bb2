//! Output files for a planned clock/reset topology.
//!
//! Three renderers turn a [`ClockTopology`] into text:
//!
//! - [`render_verilog`]: the `crg` module (`crg.v`)
//! - [`render_lpf`]: pin locations and I/O standards (`crg.lpf`)
//! - [`render_sdc`]: clock constraints (`crg.sdc`)
//!
//! [`write_outputs`] writes all three into a directory.

#![warn(missing_docs)]

pub mod error;
pub mod lpf;
pub mod sdc;
pub mod verilog;

pub use error::EmitError;
pub use lpf::render_lpf;
pub use sdc::render_sdc;
pub use verilog::render_verilog;

use crg_plan::ClockTopology;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the generated Verilog module.
pub const VERILOG_FILE: &str = "crg.v";
/// File name of the generated pin constraints.
pub const LPF_FILE: &str = "crg.lpf";
/// File name of the generated timing constraints.
pub const SDC_FILE: &str = "crg.sdc";

/// Renders every output and writes it under `dir`, creating `dir` if needed.
///
/// Returns the written paths in a fixed order: Verilog, LPF, SDC.
pub fn write_outputs(topo: &ClockTopology, dir: &Path) -> Result<Vec<PathBuf>, EmitError> {
    std::fs::create_dir_all(dir).map_err(|e| EmitError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let files = [
        (VERILOG_FILE, render_verilog(topo)),
        (LPF_FILE, render_lpf(topo)),
        (SDC_FILE, render_sdc(topo)),
    ];
    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = dir.join(name);
        std::fs::write(&path, contents).map_err(|e| EmitError::Io {
            path: path.clone(),
            source: e,
        })?;
        info!(path = %path.display(), "wrote");
        written.push(path);
    }
    Ok(written)
}
