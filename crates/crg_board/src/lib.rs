//! Board pin catalogues for the crg clock/reset generator.
//!
//! This crate provides the [`Board`] trait that abstracts over the boards a
//! clock topology can be built for, and the Colorlight i5/i9 models. The
//! planner only ever asks a board for its crystal frequency and for named
//! pins; pin-to-site mapping stays behind the trait.
//!
//! # Usage
//!
//! ```
//! use crg_board::load_board;
//!
//! let board = load_board("i5", "7.0").unwrap();
//! let clk = board.request(board.clock_pin()).unwrap();
//! assert_eq!(clk.site, "P3");
//! ```

#![warn(missing_docs)]

pub mod colorlight;
pub mod error;
pub mod pin;

pub use colorlight::{ColorlightBoard, ColorlightModel};
pub use error::BoardError;
pub use pin::PinHandle;

use crg_common::Frequency;

/// A board the clock topology is elaborated for.
///
/// Implementations own a static pin catalogue. Pin requests that name a pin
/// the board does not have fail with [`BoardError::PinUnavailable`].
pub trait Board: std::fmt::Debug {
    /// Returns the canonical board name (e.g., "i5").
    fn name(&self) -> &str;

    /// Returns the board revision (e.g., "7.0").
    fn revision(&self) -> &str;

    /// Returns the FPGA part number fitted on this board.
    fn device(&self) -> &str;

    /// Returns the frequency of the crystal wired to [`Board::clock_pin`].
    fn crystal_frequency(&self) -> Frequency;

    /// Returns the name of the crystal clock input pin.
    fn clock_pin(&self) -> &str;

    /// Returns the name of the active-low external reset pin.
    fn reset_pin(&self) -> &str;

    /// Returns the name of the pin that carries the SDRAM clock.
    fn sdram_clock_pin(&self) -> &str;

    /// Looks up a named pin in the board's catalogue.
    fn request(&self, pin: &str) -> Result<PinHandle, BoardError>;
}

/// Loads a board model by name and revision.
///
/// Supported boards: `"i5"` (revision `7.0`) and `"i9"` (revision `7.2`).
/// Names are matched case-insensitively.
///
/// # Errors
///
/// Returns [`BoardError::UnknownBoard`] for an unrecognized name and
/// [`BoardError::UnsupportedRevision`] for a revision the model does not cover.
pub fn load_board(name: &str, revision: &str) -> Result<Box<dyn Board>, BoardError> {
    let model = match name.trim().to_ascii_lowercase().as_str() {
        "i5" | "colorlight_i5" | "colorlight-i5" => ColorlightModel::I5,
        "i9" | "colorlight_i9" | "colorlight-i9" => ColorlightModel::I9,
        _ => {
            return Err(BoardError::UnknownBoard {
                name: name.to_string(),
            })
        }
    };
    Ok(Box::new(ColorlightBoard::new(model, revision.trim())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_i5() {
        let board = load_board("i5", "7.0").unwrap();
        assert_eq!(board.name(), "i5");
        assert_eq!(board.revision(), "7.0");
        assert_eq!(board.crystal_frequency(), Frequency::from_mhz(25.0));
    }

    #[test]
    fn load_is_case_insensitive() {
        let board = load_board("I9", "7.2").unwrap();
        assert_eq!(board.name(), "i9");
    }

    #[test]
    fn load_aliases() {
        assert_eq!(load_board("colorlight_i5", "7.0").unwrap().name(), "i5");
        assert_eq!(load_board("colorlight-i9", "7.2").unwrap().name(), "i9");
    }

    #[test]
    fn unknown_board() {
        let err = load_board("ulx3s", "3.0").unwrap_err();
        assert!(matches!(err, BoardError::UnknownBoard { .. }));
        assert!(err.to_string().contains("ulx3s"));
    }

    #[test]
    fn unsupported_revision() {
        let err = load_board("i5", "6.1").unwrap_err();
        assert!(matches!(err, BoardError::UnsupportedRevision { .. }));
    }

    #[test]
    fn designated_pins_resolve() {
        let board = load_board("i9", "7.2").unwrap();
        for pin in [board.clock_pin(), board.reset_pin(), board.sdram_clock_pin()] {
            assert!(board.request(pin).is_ok(), "{pin}");
        }
    }
}
