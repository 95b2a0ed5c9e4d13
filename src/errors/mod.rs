//! # Error Handling
//!
//! Error types for the harness using `thiserror`. Per-request faults inside
//! the stub server are logged and swallowed; supervisor faults are caught at
//! the supervisor boundary and converted to a status value. Only the errors
//! surfaced here terminate a run.

pub mod tls;
pub mod types;

pub use tls::TlsError;
pub use types::{HarnessError, Result};
