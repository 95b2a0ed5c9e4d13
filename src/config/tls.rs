use std::path::{Path, PathBuf};

use crate::errors::{HarnessError, Result};

/// Fixed certificate material the harness expects on disk before it starts.
/// Generation/provisioning is an external concern; the orchestrator only
/// verifies presence and the stub server loads the server pair.
#[derive(Debug, Clone)]
pub struct CertificatePaths {
    pub ca_cert: PathBuf,
    pub server_cert: PathBuf,
    pub server_key: PathBuf,
}

impl Default for CertificatePaths {
    fn default() -> Self {
        Self::in_dir(Path::new("certs"))
    }
}

impl CertificatePaths {
    /// Conventional file names inside an arbitrary directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            ca_cert: dir.join("ca-cert.pem"),
            server_cert: dir.join("server-cert.pem"),
            server_key: dir.join("server-key.pem"),
        }
    }

    /// Verify all three files exist, reporting the first missing one.
    pub fn ensure_present(&self) -> Result<()> {
        for path in [&self.ca_cert, &self.server_cert, &self.server_key] {
            if !path.exists() {
                return Err(HarnessError::PrerequisiteMissing { path: path.clone() });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_in_dir() {
        let paths = CertificatePaths::in_dir(Path::new("/tmp/fixtures"));
        assert_eq!(paths.ca_cert, PathBuf::from("/tmp/fixtures/ca-cert.pem"));
        assert_eq!(paths.server_cert, PathBuf::from("/tmp/fixtures/server-cert.pem"));
        assert_eq!(paths.server_key, PathBuf::from("/tmp/fixtures/server-key.pem"));
    }

    #[test]
    fn test_ensure_present_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = CertificatePaths::in_dir(dir.path());
        std::fs::write(&paths.ca_cert, b"pem").unwrap();

        let err = paths.ensure_present().unwrap_err();
        match err {
            HarnessError::PrerequisiteMissing { path } => {
                assert_eq!(path, paths.server_cert);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
