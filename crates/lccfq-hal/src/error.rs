//! Error types for the HAL crate.

use std::path::PathBuf;

use lccfq_compile::CompileError;
use thiserror::Error;

/// Errors that can occur while loading a device or running on it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Reading a configuration file failed.
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid YAML for a QPU.
    #[error("Configuration parse error: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// The configuration parsed but describes an impossible device.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Building the compilation pipeline for the device failed.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] CompileError),

    /// The sentinel result would need too many bitstrings.
    #[error("Cannot enumerate outcomes of {num_clbits} classical bits (at most {max})")]
    TooManyClbits { num_clbits: u32, max: u32 },
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
