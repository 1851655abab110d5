use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading an explicitly requested configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}
