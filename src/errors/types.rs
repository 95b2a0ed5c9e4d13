//! # Error Types
//!
//! The harness error taxonomy. Each variant maps to a terminal orchestration
//! failure: missing prerequisites, stub server startup, or the reachability
//! probe. Subject supervision never produces a `HarnessError`; its faults are
//! converted to a boolean at the supervisor boundary.

use std::path::PathBuf;

use crate::errors::TlsError;

/// Custom result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Main error type for the harness
#[derive(thiserror::Error, Debug)]
pub enum HarnessError {
    /// A required input file does not exist
    #[error("Required file is missing: {path}")]
    PrerequisiteMissing { path: PathBuf },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// TLS material loading errors
    #[error(transparent)]
    Tls(#[from] TlsError),

    /// Network transport errors (bind, accept)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The probe command is not installed
    #[error("Probe command `{command}` not found on PATH")]
    ProbeUnavailable { command: String },

    /// The probe ran but reported the stub server unreachable
    #[error("Reachability probe `{command}` exited with status {status}: {stderr}")]
    ProbeFailed { command: String, status: i32, stderr: String },

    /// The probe did not complete within its timeout
    #[error("Reachability probe timed out after {timeout_secs}s")]
    ProbeTimeout { timeout_secs: u64 },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }
}
