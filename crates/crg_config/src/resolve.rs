//! Flag resolution: turning a validated configuration into planner inputs.

use crate::error::ConfigError;
use crate::types::{CrgConfig, SdramRate, DEFAULT_OSC_DIVIDER, USB_ACM_UART};
use crg_common::Frequency;
use serde::Serialize;

/// Smallest divider the on-chip oscillator primitive accepts.
pub const MIN_OSC_DIVIDER: u32 = 2;
/// Largest divider the on-chip oscillator primitive accepts.
pub const MAX_OSC_DIVIDER: u32 = 128;

/// The immutable feature-flag set consumed by the clock planner.
///
/// Built once by [`resolve_flags`] and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrgFlags {
    /// Target frequency of the `system` domain.
    pub sys_clk_freq: Frequency,
    /// SDRAM PHY rate; decides which SDRAM-adjacent domains exist.
    pub sdram_rate: SdramRate,
    /// Clock from the on-chip oscillator instead of the board crystal.
    pub use_internal_osc: bool,
    /// Divider for the on-chip oscillator.
    pub osc_divider: u32,
    /// Derive the 12 MHz and 48 MHz USB domains on a dedicated PLL.
    pub enable_usb_pll: bool,
    /// Derive the pixel and serializer video domains on a dedicated PLL.
    pub enable_video_pll: bool,
}

impl Default for CrgFlags {
    fn default() -> Self {
        Self {
            sys_clk_freq: Frequency::from_mhz(60.0),
            sdram_rate: SdramRate::Full,
            use_internal_osc: false,
            osc_divider: DEFAULT_OSC_DIVIDER,
            enable_usb_pll: false,
            enable_video_pll: false,
        }
    }
}

/// Resolves a configuration into the planner's flag set.
///
/// Parses the system frequency and SDRAM rate, checks the oscillator divider
/// range and derives the optional-subsystem flags from the SoC options:
/// the USB PLL follows `soc.uart_name == "usb_acm"`, the video PLL follows
/// either video option. The two video options are mutually exclusive.
pub fn resolve_flags(config: &CrgConfig) -> Result<CrgFlags, ConfigError> {
    let clocks = &config.clocks;

    let sys_clk_freq: Frequency = clocks
        .sys_clk_freq
        .parse()
        .map_err(|e| ConfigError::invalid("clocks.sys_clk_freq", format!("{e}")))?;
    if !sys_clk_freq.is_positive() {
        return Err(ConfigError::invalid(
            "clocks.sys_clk_freq",
            format!("frequency must be positive, got {sys_clk_freq}"),
        ));
    }

    let sdram_rate: SdramRate = clocks
        .sdram_rate
        .parse()
        .map_err(|msg: String| ConfigError::invalid("clocks.sdram_rate", msg))?;

    if !(MIN_OSC_DIVIDER..=MAX_OSC_DIVIDER).contains(&clocks.osc_divider) {
        return Err(ConfigError::invalid(
            "clocks.osc_divider",
            format!(
                "divider must be in {MIN_OSC_DIVIDER}..={MAX_OSC_DIVIDER}, got {}",
                clocks.osc_divider
            ),
        ));
    }

    let soc = &config.soc;
    if soc.with_video_terminal && soc.with_video_framebuffer {
        return Err(ConfigError::invalid(
            "soc.with_video_framebuffer",
            "the video terminal and the video framebuffer are mutually exclusive",
        ));
    }

    Ok(CrgFlags {
        sys_clk_freq,
        sdram_rate,
        use_internal_osc: clocks.use_internal_osc,
        osc_divider: clocks.osc_divider,
        enable_usb_pll: soc.uart_name == USB_ACM_UART,
        enable_video_pll: soc.with_video_terminal || soc.with_video_framebuffer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn defaults_resolve() {
        let flags = resolve_flags(&CrgConfig::default()).unwrap();
        assert_eq!(flags, CrgFlags::default());
    }

    #[test]
    fn usb_acm_enables_usb_pll() {
        let config = load_config_from_str("[soc]\nuart_name = \"usb_acm\"\n").unwrap();
        let flags = resolve_flags(&config).unwrap();
        assert!(flags.enable_usb_pll);
        assert!(!flags.enable_video_pll);
    }

    #[test]
    fn either_video_option_enables_video_pll() {
        for key in ["with_video_terminal", "with_video_framebuffer"] {
            let config = load_config_from_str(&format!("[soc]\n{key} = true\n")).unwrap();
            assert!(resolve_flags(&config).unwrap().enable_video_pll, "{key}");
        }
    }

    #[test]
    fn both_video_options_conflict() {
        let toml = "[soc]\nwith_video_terminal = true\nwith_video_framebuffer = true\n";
        let config = load_config_from_str(toml).unwrap();
        let err = resolve_flags(&config).unwrap_err();
        assert_eq!(err.key(), Some("soc.with_video_framebuffer"));
    }

    #[test]
    fn bad_sdram_rate_names_key() {
        let config = load_config_from_str("[clocks]\nsdram_rate = \"1:4\"\n").unwrap();
        let err = resolve_flags(&config).unwrap_err();
        assert_eq!(err.key(), Some("clocks.sdram_rate"));
        assert!(err.to_string().contains("1:4"));
    }

    #[test]
    fn bad_frequency_names_key() {
        let config = load_config_from_str("[clocks]\nsys_clk_freq = \"fast\"\n").unwrap();
        let err = resolve_flags(&config).unwrap_err();
        assert_eq!(err.key(), Some("clocks.sys_clk_freq"));
    }

    #[test]
    fn zero_frequency_rejected() {
        let config = load_config_from_str("[clocks]\nsys_clk_freq = 0\n").unwrap();
        let err = resolve_flags(&config).unwrap_err();
        assert_eq!(err.key(), Some("clocks.sys_clk_freq"));
    }

    #[test]
    fn osc_divider_range() {
        for (div, ok) in [(1, false), (2, true), (5, true), (128, true), (129, false)] {
            let config =
                load_config_from_str(&format!("[clocks]\nosc_divider = {div}\n")).unwrap();
            assert_eq!(resolve_flags(&config).is_ok(), ok, "divider {div}");
        }
    }

    #[test]
    fn half_rate_and_internal_osc() {
        let toml = "[clocks]\nsdram_rate = \"1:2\"\nuse_internal_osc = true\nsys_clk_freq = \"50MHz\"\n";
        let flags = resolve_flags(&load_config_from_str(toml).unwrap()).unwrap();
        assert_eq!(flags.sdram_rate, SdramRate::Half);
        assert!(flags.use_internal_osc);
        assert_eq!(flags.sys_clk_freq, Frequency::from_mhz(50.0));
    }
}
