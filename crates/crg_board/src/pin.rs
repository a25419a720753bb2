//! Handles to physical board pins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved board pin: its logical name, package site and I/O standard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinHandle {
    /// The logical pin name (e.g., "clk25").
    pub name: String,
    /// The package ball (e.g., "P3").
    pub site: String,
    /// The I/O standard (e.g., "LVCMOS33").
    pub io_standard: String,
}

impl fmt::Display for PinHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.name, self.site, self.io_standard)
    }
}
