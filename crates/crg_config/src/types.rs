//! Configuration types deserialized from `crg.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The top-level configuration parsed from `crg.toml`.
///
/// Every section is optional; an empty file yields the defaults of the
/// reference Colorlight build (i5 rev 7.0, 60 MHz, SDRAM 1:1, crystal input).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrgConfig {
    /// Target board selection.
    #[serde(default)]
    pub board: BoardSection,
    /// Clock tree options.
    #[serde(default)]
    pub clocks: ClocksSection,
    /// SoC options that imply optional clock subsystems.
    #[serde(default)]
    pub soc: SocSection,
}

/// Board name and revision.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoardSection {
    /// Board name (`"i5"` or `"i9"`, case-insensitive).
    pub name: String,
    /// Board revision string.
    pub revision: String,
}

impl Default for BoardSection {
    fn default() -> Self {
        Self {
            name: "i5".to_string(),
            revision: "7.0".to_string(),
        }
    }
}

/// Clock tree options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClocksSection {
    /// Target system clock frequency, parsed to [`Frequency`](crg_common::Frequency).
    ///
    /// Accepts a string with a unit (`"60MHz"`) or a bare number of Hz.
    #[serde(deserialize_with = "deserialize_frequency_text")]
    pub sys_clk_freq: String,
    /// SDRAM rate, `"1:1"` or `"1:2"`, parsed to [`SdramRate`].
    pub sdram_rate: String,
    /// Clock the PLLs from the on-chip oscillator instead of the board crystal.
    pub use_internal_osc: bool,
    /// Divider applied to the on-chip oscillator.
    pub osc_divider: u32,
}

impl Default for ClocksSection {
    fn default() -> Self {
        Self {
            sys_clk_freq: "60MHz".to_string(),
            sdram_rate: SdramRate::Full.to_string(),
            use_internal_osc: false,
            osc_divider: DEFAULT_OSC_DIVIDER,
        }
    }
}

/// Default divider for the on-chip oscillator, landing near the 60 MHz system clock.
pub const DEFAULT_OSC_DIVIDER: u32 = 5;

/// SoC options that decide which optional clock subsystems exist.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SocSection {
    /// UART backend; `"usb_acm"` requires the USB clock domains.
    pub uart_name: String,
    /// Enable the HDMI text terminal (requires the video clock domains).
    pub with_video_terminal: bool,
    /// Enable the HDMI framebuffer (requires the video clock domains).
    pub with_video_framebuffer: bool,
}

impl Default for SocSection {
    fn default() -> Self {
        Self {
            uart_name: "serial".to_string(),
            with_video_terminal: false,
            with_video_framebuffer: false,
        }
    }
}

/// UART backend name that pulls in the USB PLL.
pub const USB_ACM_UART: &str = "usb_acm";

/// Deserializes a frequency given either as a string (`"60MHz"`) or a number of Hz.
///
/// The value is kept as text and parsed during flag resolution, so that a bad
/// value is reported against its key rather than as a TOML syntax error.
fn deserialize_frequency_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct FrequencyText;

    impl<'de> Visitor<'de> for FrequencyText {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a frequency string or a number of Hz")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(FrequencyText)
}

/// Ratio between the SDRAM PHY clock and the system clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum SdramRate {
    /// `1:1`: the PHY runs on the system clock.
    #[default]
    #[serde(rename = "1:1")]
    Full,
    /// `1:2`: a half-rate PHY adapter runs the SDRAM at twice the system clock.
    #[serde(rename = "1:2")]
    Half,
}

impl SdramRate {
    /// Returns the configuration spelling of this rate.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "1:1",
            Self::Half => "1:2",
        }
    }
}

impl fmt::Display for SdramRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SdramRate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1:1" => Ok(Self::Full),
            "1:2" => Ok(Self::Half),
            other => Err(format!("expected \"1:1\" or \"1:2\", got \"{other}\"")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn sdram_rate_parse() {
        assert_eq!("1:1".parse::<SdramRate>(), Ok(SdramRate::Full));
        assert_eq!(" 1:2 ".parse::<SdramRate>(), Ok(SdramRate::Half));
        assert!("2:1".parse::<SdramRate>().is_err());
    }

    #[test]
    fn sdram_rate_display_matches_config_spelling() {
        assert_eq!(SdramRate::Full.to_string(), "1:1");
        assert_eq!(SdramRate::Half.to_string(), "1:2");
    }

    #[test]
    fn frequency_accepts_number() {
        let config = load_config_from_str("[clocks]\nsys_clk_freq = 50000000\n").unwrap();
        assert_eq!(config.clocks.sys_clk_freq, "50000000");
    }

    #[test]
    fn frequency_accepts_float() {
        let config = load_config_from_str("[clocks]\nsys_clk_freq = 60e6\n").unwrap();
        let f: crg_common::Frequency = config.clocks.sys_clk_freq.parse().unwrap();
        assert_eq!(f.hz(), 60_000_000.0);
    }

    #[test]
    fn frequency_rejects_table() {
        assert!(load_config_from_str("[clocks.sys_clk_freq]\nvalue = 1\n").is_err());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = load_config_from_str("[clocks]\nsdram_rate = \"1:2\"\n").unwrap();
        assert_eq!(config.clocks.sdram_rate, "1:2");
        assert_eq!(config.clocks.sys_clk_freq, "60MHz");
        assert_eq!(config.clocks.osc_divider, DEFAULT_OSC_DIVIDER);
        assert_eq!(config.board.name, "i5");
    }
}
