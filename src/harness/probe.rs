//! One-shot reachability probe.
//!
//! An external HTTP client (curl by default) is pointed at the stub server
//! before the subject runs, so the TLS data path is validated end to end
//! from outside this process. `-k` is passed because the stub's certificate
//! is self-signed; trust is intentionally disabled for this probe only.

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::config::ProbeConfig;
use crate::errors::{HarnessError, Result};

/// Captured output of a successful probe.
#[derive(Debug)]
pub struct ProbeOutcome {
    pub stdout: String,
    pub stderr: String,
}

/// Run `<command> -k <url>` and interpret the exit code: 0 means the stub
/// server is reachable. Nonzero exit, a missing command, or exceeding the
/// timeout all fail the run.
pub async fn run_probe(config: &ProbeConfig, url: &str) -> Result<ProbeOutcome> {
    let command = which::which(&config.command)
        .map_err(|_| HarnessError::ProbeUnavailable { command: config.command.clone() })?;
    debug!(command = %command.display(), url, "running reachability probe");

    let output = timeout(config.timeout, Command::new(&command).arg("-k").arg(url).output())
        .await
        .map_err(|_| HarnessError::ProbeTimeout { timeout_secs: config.timeout.as_secs() })??;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        Ok(ProbeOutcome { stdout, stderr })
    } else {
        Err(HarnessError::ProbeFailed {
            command: config.command.clone(),
            status: output.status.code().unwrap_or(-1),
            stderr,
        })
    }
}
