//! # Command Line Interface
//!
//! Thin clap surface over the environment-driven configuration. Flags win
//! over `WANIP_E2E_*` variables, which win over the built-in defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{CertificatePaths, HarnessConfig};
use crate::harness::{self, TestOutcome};
use crate::observability;

#[derive(Parser)]
#[command(name = "wanip-e2e")]
#[command(about = "End-to-end harness for the WAN-IP reporting agent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the subject executable path
    #[arg(long)]
    pub subject_path: Option<PathBuf>,

    /// Override the stub server port (0 picks an ephemeral port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory holding ca-cert.pem, server-cert.pem and server-key.pem
    #[arg(long)]
    pub certs_dir: Option<PathBuf>,

    /// Override the external probe command
    #[arg(long)]
    pub probe_command: Option<String>,
}

/// Parse arguments, initialise logging, and run the harness.
pub async fn run_cli() -> anyhow::Result<TestOutcome> {
    let cli = Cli::parse();

    observability::init_logging(cli.verbose)?;

    let mut config = HarnessConfig::from_env()?;
    if let Some(subject_path) = cli.subject_path {
        config.subject.program = subject_path;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(certs_dir) = cli.certs_dir {
        config.certs = CertificatePaths::in_dir(&certs_dir);
    }
    if let Some(probe_command) = cli.probe_command {
        config.probe.command = probe_command;
    }

    Ok(harness::run(config).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::parse_from([
            "wanip-e2e",
            "--verbose",
            "--port",
            "8443",
            "--subject-path",
            "/tmp/agent",
            "--certs-dir",
            "/tmp/certs",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.port, Some(8443));
        assert_eq!(cli.subject_path, Some(PathBuf::from("/tmp/agent")));
        assert_eq!(cli.certs_dir, Some(PathBuf::from("/tmp/certs")));
        assert_eq!(cli.probe_command, None);
    }
}
