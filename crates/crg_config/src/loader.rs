//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::CrgConfig;
use std::path::Path;

/// The configuration file name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "crg.toml";

/// Loads and validates `crg.toml` from a project directory.
///
/// A missing file is not an error: the defaults are returned instead.
pub fn load_config(project_dir: &Path) -> Result<CrgConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        return Ok(CrgConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<CrgConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<CrgConfig, ConfigError> {
    let config: CrgConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present.
///
/// Value-level checks (frequencies, rates, dividers) happen in
/// [`resolve_flags`](crate::resolve_flags) so command-line overrides get the same treatment.
fn validate_config(config: &CrgConfig) -> Result<(), ConfigError> {
    if config.board.name.trim().is_empty() {
        return Err(ConfigError::MissingField("board.name".to_string()));
    }
    if config.board.revision.trim().is_empty() {
        return Err(ConfigError::MissingField("board.revision".to_string()));
    }
    Ok(())
}
