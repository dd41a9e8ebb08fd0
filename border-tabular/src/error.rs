//! Errors in the library.
use std::path::PathBuf;
use thiserror::Error;

/// Boxed cause of a persistence failure.
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum TabularError {
    /// The action set given to the agent is empty.
    #[error("Action set is empty")]
    EmptyActionSet,

    /// A hyperparameter is not finite or is outside `[0, 1]`.
    #[error("Hyperparameter {name} must be in [0, 1], got {value}")]
    InvalidHyperparameter {
        /// Name of the hyperparameter.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// An artifact of the table could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Path of the artifact.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: Cause,
    },

    /// The snapshot exists but could not be read or decoded.
    #[error("Failed to load {}: {source}", path.display())]
    Load {
        /// Path of the snapshot.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: Cause,
    },

    /// Configuration file could not be parsed or serialized.
    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// I/O error outside of the table persistence.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type of the library.
pub type Result<T> = std::result::Result<T, TabularError>;
