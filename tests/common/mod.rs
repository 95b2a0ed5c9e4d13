//! Shared fixtures for integration tests.

use std::path::Path;

use wanip_e2e::config::CertificatePaths;

/// Write a self-signed certificate pair (and a CA stand-in) for `localhost`
/// into `dir`, using the conventional file names the harness expects.
#[allow(dead_code)]
pub fn write_self_signed_certs(dir: &Path) -> CertificatePaths {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
        .expect("generate self-signed certificate");

    let paths = CertificatePaths::in_dir(dir);
    std::fs::write(&paths.ca_cert, certified.cert.pem()).expect("write ca cert");
    std::fs::write(&paths.server_cert, certified.cert.pem()).expect("write server cert");
    std::fs::write(&paths.server_key, certified.key_pair.serialize_pem())
        .expect("write server key");
    paths
}

/// Write an executable shell script into `dir` and return its path.
#[cfg(unix)]
#[allow(dead_code)]
pub fn write_script(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write script");
    let mut perms = std::fs::metadata(&path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod script");
    path
}
