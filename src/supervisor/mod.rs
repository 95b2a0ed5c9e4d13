//! # Subject Supervisor
//!
//! Runs the subject binary under controlled inputs for a bounded window and
//! captures evidence of its behavior. The subject inherits the current
//! environment with the credential variables overlaid, runs unattended for
//! the configured window, and is then terminated in two phases: a polite
//! SIGTERM, and SIGKILL if it has not exited within the grace period.
//!
//! The supervisor asserts nothing about the subject's output; it only
//! captures and prints it. All faults are caught at [`SubjectSupervisor::run`]
//! and converted to a boolean so a misbehaving subject can never abort the
//! orchestrator.

pub mod credentials;

use std::process::{ExitStatus, Stdio};

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info};

use crate::config::SubjectConfig;

pub use credentials::SubjectCredentials;

/// Lifecycle of the subject process as the supervisor drives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationState {
    /// Spawned; inside the unattended run window.
    Running,
    /// SIGTERM delivered; waiting out the grace period.
    TerminationRequested,
    /// Exited within the grace period.
    Exited,
    /// Did not exit in time and was killed.
    ForceKilled,
}

/// What the supervised run produced.
#[derive(Debug)]
pub struct SubjectReport {
    pub state: TerminationState,
    pub exit_status: Option<ExitStatus>,
    /// Combined stdout/stderr, in arrival order.
    pub output: String,
}

pub struct SubjectSupervisor {
    config: SubjectConfig,
    credentials: SubjectCredentials,
}

impl SubjectSupervisor {
    pub fn new(config: SubjectConfig) -> Self {
        Self { config, credentials: SubjectCredentials::generate() }
    }

    pub fn credentials(&self) -> &SubjectCredentials {
        &self.credentials
    }

    /// Full spawn → run → terminate → drain sequence, reported as a boolean.
    /// Success means the sequence completed without an unhandled error, not
    /// that the subject's output was meaningful.
    pub async fn run(&self) -> bool {
        println!("🧪 Testing subject binary with environment variables...");
        println!("   KEY: {}", self.credentials.key);
        println!("   TOKEN: {}", self.credentials.token);
        println!("   HASH: {}", self.credentials.hash);
        println!("   HOST: {}", self.credentials.host);
        println!("   SLEEP_DURATION: {}", self.credentials.sleep_duration);
        println!("🚀 Starting subject binary...");

        match self.supervise().await {
            Ok(report) => {
                println!("📋 Subject output:");
                println!("{}", report.output);
                info!(
                    state = ?report.state,
                    exit_status = ?report.exit_status,
                    "subject run complete"
                );
                true
            }
            Err(err) => {
                error!(error = ?err, "subject supervision failed");
                false
            }
        }
    }

    /// Typed supervision result, for callers (and tests) that need more than
    /// the pass/fail boundary of [`run`].
    pub async fn supervise(&self) -> anyhow::Result<SubjectReport> {
        let mut command = Command::new(&self.config.program);
        command
            .envs(self.credentials.env_overlay())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().with_context(|| {
            format!("failed to spawn subject at {}", self.config.program.display())
        })?;
        let mut state = TerminationState::Running;
        debug!(pid = ?child.id(), state = ?state, "subject spawned");

        let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
        let stdout = child.stdout.take().context("subject stdout was not captured")?;
        let stderr = child.stderr.take().context("subject stderr was not captured")?;
        let readers =
            [spawn_line_reader(stdout, line_tx.clone()), spawn_line_reader(stderr, line_tx)];

        println!("⏳ Letting subject run for {}s...", self.config.run_window.as_secs());
        sleep(self.config.run_window).await;

        println!("🛑 Stopping subject...");
        state = TerminationState::TerminationRequested;
        request_graceful_termination(&child);

        let exit_status = match timeout(self.config.grace_period, child.wait()).await {
            Ok(status) => {
                state = TerminationState::Exited;
                status.context("failed to collect subject exit status")?
            }
            Err(_) => {
                child.kill().await.context("failed to force-kill subject")?;
                state = TerminationState::ForceKilled;
                child.wait().await.context("failed to collect subject exit status")?
            }
        };

        // Readers finish at pipe EOF; bound the drain so an inherited pipe
        // held open by a grandchild cannot hang the harness.
        let _ = timeout(self.config.grace_period, async {
            for reader in readers {
                let _ = reader.await;
            }
        })
        .await;

        let mut output = String::new();
        while let Ok(line) = line_rx.try_recv() {
            output.push_str(&line);
            output.push('\n');
        }

        Ok(SubjectReport { state, exit_status: Some(exit_status), output })
    }
}

fn spawn_line_reader<R>(
    reader: R,
    line_tx: mpsc::UnboundedSender<String>,
) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    })
}

#[cfg(unix)]
fn request_graceful_termination(child: &Child) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    match child.id() {
        Some(pid) => {
            if let Err(err) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                debug!(%err, "SIGTERM delivery failed; subject may have already exited");
            }
        }
        None => debug!("subject already reaped before termination request"),
    }
}

#[cfg(not(unix))]
fn request_graceful_termination(child: &Child) {
    // No polite signal available; the grace-period timeout escalates to kill.
    let _ = child;
}
