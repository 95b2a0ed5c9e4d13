//! # Orchestrator
//!
//! Sequences one full run: certificate precheck, stub server startup,
//! readiness confirmation, external reachability probe, supervised subject
//! execution, deterministic server teardown, and the final verdict. The
//! phase machine is linear and terminal on the first hard failure; only the
//! subject supervisor converts its faults to a soft failure.

pub mod probe;

use std::time::Duration;

use tracing::info;

use crate::config::HarnessConfig;
use crate::server::StubServerHandle;
use crate::supervisor::SubjectSupervisor;

/// Bound on the readiness confirmation after the listener reports bound.
const READINESS_TIMEOUT: Duration = Duration::from_secs(3);

/// Final verdict of a harness run. The process exit status must be 0 iff
/// `passed` is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestOutcome {
    pub passed: bool,
}

impl TestOutcome {
    fn failed() -> Self {
        Self { passed: false }
    }
}

/// Run the whole scenario. Every failure prints a marked diagnostic line
/// before returning; there is no silent failure path.
pub async fn run(config: HarnessConfig) -> TestOutcome {
    println!("🏁 Starting {} integration run", crate::APP_NAME);

    // Phase 1: prerequisite certificate material.
    if let Err(err) = config.certs.ensure_present() {
        println!("❌ Certificate files not found: {}", err);
        println!("   Provision the PEM fixtures before running the harness.");
        return TestOutcome::failed();
    }

    // Phase 2: stub server on a background task.
    let mut server = match StubServerHandle::start(&config.server, &config.certs).await {
        Ok(server) => server,
        Err(err) => {
            println!("❌ Failed to start HTTPS stub server: {}", err);
            return TestOutcome::failed();
        }
    };
    println!("🔒 HTTPS stub server started on port {}", server.local_addr().port());

    // Phase 3: readiness. The listener was bound before start() returned;
    // this confirms it is accepting connections.
    if !server.wait_until_ready(READINESS_TIMEOUT).await {
        println!("❌ Stub server did not become ready within {:?}", READINESS_TIMEOUT);
        server.stop().await;
        return TestOutcome::failed();
    }

    // Phase 4: external reachability probe.
    let url = config.probe_url(server.local_addr().port());
    match probe::run_probe(&config.probe, &url).await {
        Ok(outcome) => {
            println!("✅ Stub server responding: {}", outcome.stdout.trim());
        }
        Err(err) => {
            println!("❌ Stub server not reachable: {}", err);
            server.stop().await;
            return TestOutcome::failed();
        }
    }
    println!("🔗 Stub server is up and running!");

    // Phase 5: supervised subject execution.
    let supervisor = SubjectSupervisor::new(config.subject.clone());
    let subject_succeeded = supervisor.run().await;

    // Phase 6: deterministic teardown regardless of the subject result.
    server.stop().await;
    info!("stub server stopped");

    // Phase 7: report.
    if subject_succeeded {
        println!("✅ Integration run completed successfully!");
    } else {
        println!("❌ Integration run failed!");
    }
    TestOutcome { passed: subject_succeeded }
}
