//! Colorlight i5 / i9 receiver-card boards.
//!
//! Both boards carry a Lattice ECP5 in a CABGA381 package behind the same
//! SODIMM-style connector, so they share one pin catalogue and differ only in
//! the fitted part and the supported revision. The clock input is a 25 MHz
//! crystal oscillator.

use crate::error::BoardError;
use crate::pin::PinHandle;
use crate::Board;
use crg_common::Frequency;

/// A pin catalogue entry.
struct PinDef {
    /// Logical pin name.
    name: &'static str,
    /// Package ball.
    site: &'static str,
    /// I/O standard.
    io_standard: &'static str,
}

/// Pins shared by every Colorlight i-series module.
const COLORLIGHT_PINS: &[PinDef] = &[
    PinDef {
        name: "clk25",
        site: "P3",
        io_standard: "LVCMOS33",
    },
    PinDef {
        name: "cpu_reset_n",
        site: "K18",
        io_standard: "LVCMOS33",
    },
    PinDef {
        name: "user_led_n",
        site: "U16",
        io_standard: "LVCMOS33",
    },
    PinDef {
        name: "serial_tx",
        site: "J17",
        io_standard: "LVCMOS33",
    },
    PinDef {
        name: "serial_rx",
        site: "H18",
        io_standard: "LVCMOS33",
    },
    PinDef {
        name: "sdram_clock",
        site: "B9",
        io_standard: "LVCMOS33",
    },
];

/// The Colorlight module variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorlightModel {
    /// Colorlight i5, LFE5U-25F.
    I5,
    /// Colorlight i9, LFE5U-45F.
    I9,
}

impl ColorlightModel {
    /// Returns the short board name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::I5 => "i5",
            Self::I9 => "i9",
        }
    }

    /// Returns the fitted FPGA part number.
    pub fn device(&self) -> &'static str {
        match self {
            Self::I5 => "LFE5U-25F-6BG381C",
            Self::I9 => "LFE5U-45F-6BG381C",
        }
    }

    /// Returns the revisions this model covers.
    pub fn revisions(&self) -> &'static [&'static str] {
        match self {
            Self::I5 => &["7.0"],
            Self::I9 => &["7.2"],
        }
    }
}

/// A Colorlight board in a specific revision.
#[derive(Debug, Clone)]
pub struct ColorlightBoard {
    model: ColorlightModel,
    revision: &'static str,
}

impl ColorlightBoard {
    /// Crystal frequency on `clk25`.
    pub const CRYSTAL_HZ: f64 = 25_000_000.0;

    /// Creates a board model, checking the revision against the catalogue.
    pub fn new(model: ColorlightModel, revision: &str) -> Result<Self, BoardError> {
        let revision = model
            .revisions()
            .iter()
            .copied()
            .find(|r| *r == revision)
            .ok_or_else(|| BoardError::UnsupportedRevision {
                board: model.name().to_string(),
                revision: revision.to_string(),
                supported: model.revisions().join(", "),
            })?;
        Ok(Self { model, revision })
    }

    /// Returns the module variant.
    pub fn model(&self) -> ColorlightModel {
        self.model
    }
}

impl Board for ColorlightBoard {
    fn name(&self) -> &str {
        self.model.name()
    }

    fn revision(&self) -> &str {
        self.revision
    }

    fn device(&self) -> &str {
        self.model.device()
    }

    fn crystal_frequency(&self) -> Frequency {
        Frequency::new(Self::CRYSTAL_HZ)
    }

    fn clock_pin(&self) -> &str {
        "clk25"
    }

    fn reset_pin(&self) -> &str {
        "cpu_reset_n"
    }

    fn sdram_clock_pin(&self) -> &str {
        "sdram_clock"
    }

    fn request(&self, pin: &str) -> Result<PinHandle, BoardError> {
        COLORLIGHT_PINS
            .iter()
            .find(|def| def.name == pin)
            .map(|def| PinHandle {
                name: def.name.to_string(),
                site: def.site.to_string(),
                io_standard: def.io_standard.to_string(),
            })
            .ok_or_else(|| BoardError::PinUnavailable {
                pin: pin.to_string(),
                board: format!("{} rev {}", self.model.name(), self.revision),
            })
    }
}
