//! # Configuration Management
//!
//! Environment-driven configuration for the harness. Every knob has a default
//! matching the production scenario (stub on 443, 30 second run window,
//! 10 second grace period); `WANIP_E2E_*` variables override them so tests
//! can run on ephemeral ports with short windows.

pub mod tls;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{HarnessError, Result};

pub use tls::CertificatePaths;

/// Absolute path of the subject binary when none is configured.
pub const DEFAULT_SUBJECT_PATH: &str = "/usr/local/bin/wanip-agent";

/// Command used for the one-shot reachability probe.
pub const DEFAULT_PROBE_COMMAND: &str = "curl";

/// Top-level harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub server: StubServerConfig,
    pub certs: CertificatePaths,
    pub subject: SubjectConfig,
    pub probe: ProbeConfig,
}

/// Stub server listener configuration
#[derive(Debug, Clone)]
pub struct StubServerConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for StubServerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0".to_string(), port: 443 }
    }
}

/// Subject process configuration
#[derive(Debug, Clone)]
pub struct SubjectConfig {
    /// Path of the subject executable; spawned with no arguments.
    pub program: PathBuf,
    /// Unattended run window before termination is requested.
    pub run_window: Duration,
    /// Bounded wait after the graceful termination request.
    pub grace_period: Duration,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_SUBJECT_PATH),
            run_window: Duration::from_secs(30),
            grace_period: Duration::from_secs(10),
        }
    }
}

/// Reachability probe configuration
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// External HTTP client command, resolved on PATH.
    pub command: String,
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { command: DEFAULT_PROBE_COMMAND.to_string(), timeout: Duration::from_secs(10) }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            server: StubServerConfig::default(),
            certs: CertificatePaths::default(),
            subject: SubjectConfig::default(),
            probe: ProbeConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("WANIP_E2E_PORT")
            .unwrap_or_else(|_| "443".to_string())
            .parse()
            .map_err(|e| HarnessError::config(format!("Invalid stub server port: {}", e)))?;

        let bind_address =
            std::env::var("WANIP_E2E_BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string());

        let certs = match std::env::var("WANIP_E2E_CERTS_DIR") {
            Ok(dir) => CertificatePaths::in_dir(Path::new(&dir)),
            Err(_) => CertificatePaths::default(),
        };

        let program = std::env::var("WANIP_E2E_SUBJECT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SUBJECT_PATH));

        let run_window = duration_from_env("WANIP_E2E_RUN_WINDOW_SECS", 30)?;
        let grace_period = duration_from_env("WANIP_E2E_GRACE_PERIOD_SECS", 10)?;

        let probe_command = std::env::var("WANIP_E2E_PROBE_COMMAND")
            .unwrap_or_else(|_| DEFAULT_PROBE_COMMAND.to_string());
        let probe_timeout = duration_from_env("WANIP_E2E_PROBE_TIMEOUT_SECS", 10)?;

        Ok(Self {
            server: StubServerConfig { bind_address, port },
            certs,
            subject: SubjectConfig { program, run_window, grace_period },
            probe: ProbeConfig { command: probe_command, timeout: probe_timeout },
        })
    }

    /// Probe URL for the stub server at the given bound port. The default
    /// HTTPS port is elided so the production invocation stays
    /// `https://localhost/ip.txt`.
    pub fn probe_url(&self, port: u16) -> String {
        if port == 443 {
            "https://localhost/ip.txt".to_string()
        } else {
            format!("https://localhost:{}/ip.txt", port)
        }
    }
}

fn duration_from_env(var: &str, default_secs: u64) -> Result<Duration> {
    let secs = std::env::var(var)
        .unwrap_or_else(|_| default_secs.to_string())
        .parse()
        .map_err(|e| HarnessError::config(format!("Invalid {}: {}", var, e)))?;
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.server.port, 443);
        assert_eq!(config.subject.program, PathBuf::from(DEFAULT_SUBJECT_PATH));
        assert_eq!(config.subject.run_window, Duration::from_secs(30));
        assert_eq!(config.subject.grace_period, Duration::from_secs(10));
        assert_eq!(config.probe.command, "curl");
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("WANIP_E2E_PORT", "8443");
        env::set_var("WANIP_E2E_RUN_WINDOW_SECS", "2");

        let config = HarnessConfig::from_env().unwrap();
        assert_eq!(config.server.port, 8443);
        assert_eq!(config.subject.run_window, Duration::from_secs(2));

        env::remove_var("WANIP_E2E_PORT");
        env::remove_var("WANIP_E2E_RUN_WINDOW_SECS");
    }

    #[test]
    fn test_probe_url_elides_default_port() {
        let config = HarnessConfig::default();
        assert_eq!(config.probe_url(443), "https://localhost/ip.txt");
        assert_eq!(config.probe_url(8443), "https://localhost:8443/ip.txt");
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        // Uses a variable from_env never reads; env mutation is process-wide.
        env::set_var("WANIP_E2E_TEST_DURATION", "soon");
        assert!(duration_from_env("WANIP_E2E_TEST_DURATION", 10).is_err());
        env::remove_var("WANIP_E2E_TEST_DURATION");
    }
}
