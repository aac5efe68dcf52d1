//! Error types for the callback system
//!
//! Configuration problems surface at construction time; everything raised
//! inside a hook propagates through the container to the training loop.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for callback operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by callbacks and their collaborators
#[derive(Debug, Error)]
pub enum Error {
    /// Checkpoint prefix has no directory component
    #[error("Invalid checkpoint filepath: {path}\n  → Use the full path including the root of the filenames, e.g. 'checkpoints/weights_out'")]
    InvalidFilepath { path: PathBuf },

    /// IO error with context
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Weight state could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Loaded weight state does not match the model's parameters
    #[error("State dict mismatch: missing {missing:?}, unexpected {unexpected:?}")]
    StateMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// Scheduler and optimizer shapes disagree
    #[error("Optimizer mismatch: {0}")]
    OptimizerMismatch(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether this error stems from how the callbacks were configured
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFilepath { .. } | Self::ConfigError(_) | Self::OptimizerMismatch(_)
        )
    }
}
