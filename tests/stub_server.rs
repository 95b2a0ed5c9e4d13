//! TLS integration tests for the stub server: a real acceptor on an
//! ephemeral port, exercised by an HTTPS client that accepts the
//! self-signed certificate the way the external probe does.

mod common;

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use wanip_e2e::config::{CertificatePaths, StubServerConfig};
use wanip_e2e::server::StubServerHandle;

fn localhost_config() -> StubServerConfig {
    StubServerConfig { bind_address: "127.0.0.1".to_string(), port: 0 }
}

async fn start_stub(certs: &CertificatePaths) -> StubServerHandle {
    let server =
        StubServerHandle::start(&localhost_config(), certs).await.expect("start stub server");
    assert!(server.wait_until_ready(Duration::from_secs(3)).await, "stub server not ready");
    server
}

fn insecure_client() -> reqwest::Client {
    wanip_e2e::install_crypto_provider();
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()
        .expect("build https client")
}

#[tokio::test]
async fn test_tls_stub_serves_fixed_routes() {
    let dir = tempfile::tempdir().unwrap();
    let certs = common::write_self_signed_certs(dir.path());
    let mut server = start_stub(&certs).await;
    let port = server.local_addr().port();
    let client = insecure_client();

    let response =
        client.get(format!("https://localhost:{port}/ip.txt")).send().await.expect("GET /ip.txt");
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[reqwest::header::CONTENT_TYPE], "text/plain");
    assert_eq!(response.text().await.unwrap(), "192.168.1.100");

    let response = client
        .get(format!("https://localhost:{port}/something-else"))
        .send()
        .await
        .expect("GET unknown path");
    assert_eq!(response.status(), 404);
    assert_eq!(response.text().await.unwrap(), "Not Found");

    let response = client
        .post(format!("https://localhost:{port}/data/deadbeef/"))
        .body("payload=abc123")
        .send()
        .await
        .expect("POST payload");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");

    server.stop().await;
}

#[tokio::test]
async fn test_handshake_failure_does_not_stop_serving() {
    let dir = tempfile::tempdir().unwrap();
    let certs = common::write_self_signed_certs(dir.path());
    let mut server = start_stub(&certs).await;
    let port = server.local_addr().port();

    // A plaintext client; the TLS handshake fails server-side.
    let mut raw = TcpStream::connect(server.local_addr()).await.expect("raw connect");
    raw.write_all(b"GET /ip.txt HTTP/1.0\r\n\r\n").await.expect("raw write");
    drop(raw);

    // The listener must keep serving TLS clients afterwards.
    let client = insecure_client();
    let response = client
        .get(format!("https://localhost:{port}/ip.txt"))
        .send()
        .await
        .expect("GET after bad handshake");
    assert_eq!(response.status(), 200);

    server.stop().await;
}

#[tokio::test]
async fn test_stop_releases_the_listener() {
    let dir = tempfile::tempdir().unwrap();
    let certs = common::write_self_signed_certs(dir.path());
    let mut server = start_stub(&certs).await;
    let addr = server.local_addr();

    server.stop().await;

    for _ in 0..50 {
        if TcpStream::connect(addr).await.is_err() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("listener still accepting connections after stop");
}
