//! Error types for writing emitted files.

use std::path::PathBuf;

/// A failure writing generated files.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// An I/O error occurred while creating the output directory or a file.
    #[error("failed to write {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
