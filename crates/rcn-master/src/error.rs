//! Controller error type.

use std::path::PathBuf;

use rcn_ir::AudioError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Malformed register sequence text
    #[error("sequence line {line}: {message}")]
    Sequence { line: usize, message: String },
    #[error(transparent)]
    Audio(#[from] AudioError),
}
