//! # Stub Server
//!
//! A TLS-terminated stand-in for the remote metadata endpoint the subject
//! polls. Scoped resource: [`StubServerHandle::start`] returns only after
//! the listener is bound (the readiness signal), the server runs on a
//! background task that never keeps the process alive by itself, and
//! [`StubServerHandle::stop`] triggers graceful shutdown.

pub mod routes;
pub mod tls;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::config::{CertificatePaths, StubServerConfig};
use crate::errors::{HarnessError, Result};

#[derive(Debug)]
pub struct StubServerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
    local_addr: SocketAddr,
}

impl StubServerHandle {
    /// Bind the listener, wrap it with TLS, and serve on a background task.
    /// A successful return means the socket is already accepting connections.
    pub async fn start(config: &StubServerConfig, certs: &CertificatePaths) -> Result<Self> {
        let acceptor = tls::build_acceptor(&certs.server_cert, &certs.server_key)?;

        let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
            .parse()
            .map_err(|e| HarnessError::config(format!("Invalid stub server address: {}", e)))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| HarnessError::transport(format!("Failed to bind stub server: {}", e)))?;
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = routes::build_router();
        let tls_listener = tls::TlsListener::new(listener, acceptor);

        let task = tokio::spawn(async move {
            let server = axum::serve(tls_listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = server.await {
                error!(error = %e, "stub server terminated with error");
            }
        });

        info!(address = %local_addr, "HTTPS stub server listening");
        Ok(Self { shutdown: Some(shutdown_tx), task, local_addr })
    }

    /// Address the listener actually bound (resolves port 0 to the
    /// ephemeral port the kernel picked).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Confirm the listener accepts TCP connections within `timeout`.
    pub async fn wait_until_ready(&self, timeout: Duration) -> bool {
        let ip = if self.local_addr.ip().is_unspecified() {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.local_addr.ip()
        };
        let probe_addr = SocketAddr::new(ip, self.local_addr.port());

        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if TcpStream::connect(probe_addr).await.is_ok() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        false
    }

    /// Request graceful shutdown and wait briefly for the serve task to end.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(Duration::from_secs(5), &mut self.task).await;
    }
}

impl Drop for StubServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task.abort();
    }
}
