//! # wanip-e2e
//!
//! End-to-end harness for the WAN-IP reporting agent. It stands up a
//! TLS-terminating stub of the agent's remote metadata endpoint, launches the
//! agent as a child process with freshly generated credentials, lets it run
//! for a bounded window, and reports pass/fail through the process exit
//! status.
//!
//! ## Components
//!
//! - **Stub server** ([`server`]): axum over tokio-rustls, answering
//!   `GET /ip.txt` with a fixed address and acknowledging any POST, with
//!   every request logged before it is answered.
//! - **Subject supervisor** ([`supervisor`]): environment injection, a
//!   30 second unattended run window, and two-phase SIGTERM → SIGKILL
//!   termination with combined output capture.
//! - **Orchestrator** ([`harness`]): the linear phase machine tying both
//!   together, with an external `curl -k` reachability probe in between.

pub mod cli;
pub mod config;
pub mod errors;
pub mod harness;
pub mod observability;
pub mod server;
pub mod supervisor;

pub use config::HarnessConfig;
pub use errors::{HarnessError, Result};
pub use harness::TestOutcome;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Install the process-wide rustls crypto provider. Idempotent; the binary
/// calls this at startup and integration tests call it before building TLS
/// clients.
pub fn install_crypto_provider() {
    use rustls::crypto::{ring, CryptoProvider};

    if CryptoProvider::get_default().is_none() {
        let _ = ring::default_provider().install_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "wanip-e2e");
    }

    #[test]
    fn test_install_crypto_provider_is_idempotent() {
        install_crypto_provider();
        install_crypto_provider();
    }
}
