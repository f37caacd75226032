//! # Error Types
//!
//! Custom error types for Joy Bridge using `thiserror`.

use thiserror::Error;

use crate::controller::profile::{LogicalAxis, LogicalButton};

/// Main error type for Joy Bridge
#[derive(Debug, Error)]
pub enum JoyBridgeError {
    /// Configuration errors (TOML parse or validation)
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// No controller model was given on the command line or in the config file
    #[error("no controller model specified (use --model or set controller.model)")]
    MissingModel,

    /// The requested controller model has no registered profile
    #[error("unknown controller model '{0}'")]
    UnknownModel(String),

    /// A device profile is missing a required axis mapping
    #[error("device profile missing required axis {0:?}")]
    MissingAxis(LogicalAxis),

    /// A device profile is missing a required button mapping
    #[error("device profile missing required button {0:?}")]
    MissingButton(LogicalButton),

    /// The selected controller could not be opened
    #[error("could not open controller {id}: {reason}")]
    DeviceOpen { id: usize, reason: String },

    /// A single poll's controller read failed (recoverable)
    #[error("controller read failed: {0}")]
    DeviceRead(String),

    /// A vehicle action call failed
    #[error("vehicle command failed: {0}")]
    Vehicle(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Joy Bridge
pub type Result<T> = std::result::Result<T, JoyBridgeError>;
