//! Subject credentials.
//!
//! Fresh secrets for every run, drawn from the operating system CSPRNG.
//! These are harness-local throwaways, printed for diagnostics; they must
//! still be generated like real secrets so the subject cannot distinguish a
//! test run from production.

use rand::rngs::OsRng;
use rand::RngCore;

/// Environment-variable contract for the subject process.
#[derive(Debug, Clone)]
pub struct SubjectCredentials {
    /// 200 hex characters.
    pub key: String,
    /// 32 hex characters.
    pub token: String,
    /// 16 hex characters.
    pub hash: String,
    /// Hostname of the stub endpoint.
    pub host: String,
    /// Poll interval handed to the subject, in seconds.
    pub sleep_duration: u64,
}

impl SubjectCredentials {
    /// Generate fresh credentials from `OsRng`.
    pub fn generate() -> Self {
        Self {
            key: random_hex(100),
            token: random_hex(16),
            hash: random_hex(8),
            host: "localhost".to_string(),
            sleep_duration: 1,
        }
    }

    /// Variables overlaid onto the inherited environment at spawn time.
    pub fn env_overlay(&self) -> [(&'static str, String); 5] {
        [
            ("KEY", self.key.clone()),
            ("TOKEN", self.token.clone()),
            ("HASH", self.hash.clone()),
            ("HOST", self.host.clone()),
            ("SLEEP_DURATION", self.sleep_duration.to_string()),
        ]
    }
}

/// `byte_len` random bytes from the OS CSPRNG, hex-encoded (twice as many
/// output characters).
fn random_hex(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
