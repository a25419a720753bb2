//! Shared steps for every command: configuration, overrides, planning.

use std::path::PathBuf;

use crg_config::{CrgConfig, CrgFlags};
use crg_plan::{build_topology, ClockTopology, PlanError};
use crg_pll::Ecp5Pll;
use tracing::debug;

use crate::{GlobalArgs, OverrideArgs};

/// Loads the configuration named by `--config`, or `crg.toml` in the
/// current directory.
///
/// `--config` may name the file itself or its directory. A missing
/// `crg.toml` in a directory yields the defaults; a missing explicit file is
/// an error.
pub fn load_config(global: &GlobalArgs) -> Result<CrgConfig, Box<dyn std::error::Error>> {
    match global.config {
        Some(ref config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_dir() {
                Ok(crg_config::load_config(&p)?)
            } else {
                debug!(path = %p.display(), "loading configuration file");
                Ok(crg_config::load_config_file(&p)?)
            }
        }
        None => Ok(crg_config::load_config(&std::env::current_dir()?)?),
    }
}

/// Applies command-line overrides on top of the file configuration.
pub fn apply_overrides(config: &mut CrgConfig, overrides: &OverrideArgs) {
    if let Some(ref board) = overrides.board {
        config.board.name = board.clone();
    }
    if let Some(ref revision) = overrides.revision {
        config.board.revision = revision.clone();
    }
    if let Some(ref freq) = overrides.sys_clk_freq {
        config.clocks.sys_clk_freq = freq.clone();
    }
    if let Some(ref rate) = overrides.sdram_rate {
        config.clocks.sdram_rate = rate.clone();
    }
    if overrides.internal_osc {
        config.clocks.use_internal_osc = true;
    }
    if let Some(divider) = overrides.osc_divider {
        config.clocks.osc_divider = divider;
    }
    if let Some(ref uart) = overrides.uart_name {
        config.soc.uart_name = uart.clone();
    }
    if overrides.video_terminal {
        config.soc.with_video_terminal = true;
    }
    if overrides.video_framebuffer {
        config.soc.with_video_framebuffer = true;
    }
}

/// Loads, overrides and resolves the configuration, then plans the topology.
pub fn plan_topology(
    global: &GlobalArgs,
    overrides: &OverrideArgs,
) -> Result<ClockTopology, Box<dyn std::error::Error>> {
    let mut config = load_config(global)?;
    apply_overrides(&mut config, overrides);
    let flags: CrgFlags = crg_config::resolve_flags(&config)?;
    debug!(?flags, "flags resolved");

    if !global.quiet {
        eprintln!(
            "   Planning {} rev {} at {} (SDRAM {}{}{})",
            config.board.name,
            config.board.revision,
            flags.sys_clk_freq,
            flags.sdram_rate,
            if flags.enable_usb_pll { ", USB" } else { "" },
            if flags.enable_video_pll { ", video" } else { "" },
        );
    }

    let board = crg_board::load_board(&config.board.name, &config.board.revision)
        .map_err(PlanError::from)?;
    let topology = build_topology(&flags, board.as_ref(), &Ecp5Pll::new())?;
    Ok(topology)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crg_config::USB_ACM_UART;
    use crg_plan::domain::{SYSTEM_DOUBLE_RATE, USB_48, VIDEO_PIXEL};
    use std::fs;
    use tempfile::TempDir;

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config,
        }
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = crg_config::load_config_from_str(
            "[board]\nname = \"i5\"\nrevision = \"7.0\"\n[clocks]\nsdram_rate = \"1:1\"\n",
        )
        .unwrap();
        let overrides = OverrideArgs {
            board: Some("i9".to_string()),
            revision: Some("7.2".to_string()),
            sdram_rate: Some("1:2".to_string()),
            uart_name: Some(USB_ACM_UART.to_string()),
            video_framebuffer: true,
            ..OverrideArgs::default()
        };
        apply_overrides(&mut config, &overrides);
        assert_eq!(config.board.name, "i9");
        assert_eq!(config.clocks.sdram_rate, "1:2");
        let flags = crg_config::resolve_flags(&config).unwrap();
        assert!(flags.enable_usb_pll);
        assert!(flags.enable_video_pll);
    }

    #[test]
    fn unset_overrides_keep_file_values() {
        let mut config = crg_config::load_config_from_str("[clocks]\nosc_divider = 31\n").unwrap();
        apply_overrides(&mut config, &OverrideArgs::default());
        assert_eq!(config.clocks.osc_divider, 31);
        assert!(!config.clocks.use_internal_osc);
    }

    #[test]
    fn plan_from_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("crg.toml");
        fs::write(
            &path,
            "[clocks]\nsdram_rate = \"1:2\"\n[soc]\nuart_name = \"usb_acm\"\n",
        )
        .unwrap();
        let topo = plan_topology(
            &global(Some(path.to_str().unwrap().to_string())),
            &OverrideArgs::default(),
        )
        .unwrap();
        assert!(topo.registry.contains(SYSTEM_DOUBLE_RATE));
        assert!(topo.registry.contains(USB_48));
        assert!(!topo.registry.contains(VIDEO_PIXEL));
    }

    #[test]
    fn plan_from_config_dir_without_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let topo = plan_topology(
            &global(Some(tmp.path().to_str().unwrap().to_string())),
            &OverrideArgs::default(),
        )
        .unwrap();
        assert_eq!(topo.board.name, "i5");
        assert_eq!(topo.registry.len(), 2);
    }

    #[test]
    fn unknown_board_names_flag() {
        let tmp = TempDir::new().unwrap();
        let overrides = OverrideArgs {
            board: Some("ulx3s".to_string()),
            ..OverrideArgs::default()
        };
        let err = plan_topology(&global(Some(tmp.path().to_str().unwrap().to_string())), &overrides)
            .unwrap_err();
        assert!(err.to_string().contains("board.name"), "{err}");
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.toml");
        assert!(load_config(&global(Some(path.to_str().unwrap().to_string()))).is_err());
    }
}
