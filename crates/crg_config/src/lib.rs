//! Parsing and validation of `crg.toml` clock/reset generator configuration.
//!
//! This crate reads the configuration file into a strongly-typed [`CrgConfig`]
//! and resolves it into the immutable [`CrgFlags`] the planner consumes.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_flags, CrgFlags};
pub use types::*;
