//! # Error Types
//!
//! Custom error types for the five-bar teleoperation core using `thiserror`.
//!
//! Unreachable targets are not errors: the kinematics solver reports them as
//! `None`. Everything here is a configuration, device or bus failure.

use thiserror::Error;

/// Main error type for the five-bar teleoperation core
#[derive(Debug, Error)]
pub enum FiveBarError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port errors (open, write, read, timeout)
    #[error("Serial error: {0}")]
    Serial(String),

    /// Game-pad errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// No game-pad attached
    #[error("No game-pad found")]
    ControllerNotFound,

    /// Actuator bus protocol errors (bad framing, CRC mismatch, error status)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The actuator family does not provide this operation
    #[error("Operation `{0}` is not supported by this actuator")]
    Unsupported(&'static str),
}

/// Result type alias for the five-bar teleoperation core
pub type Result<T> = std::result::Result<T, FiveBarError>;
