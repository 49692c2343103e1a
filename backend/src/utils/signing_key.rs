//! Process-wide symmetric key for the token codec.
//!
//! The key is created once during startup and read-only afterwards. With a
//! configured key file the init step is load-or-generate-and-persist, so a
//! fleet sharing one file survives restarts; without one the key lives only
//! in memory and a restart invalidates every outstanding token.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::{rngs::OsRng, RngCore};

const KEY_LEN: usize = 32;

#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Explicit init step. Reads the key from `path` when the file exists,
    /// otherwise generates fresh material (persisting it when a path was
    /// given).
    pub fn init(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) if path.exists() => {
                let encoded = fs::read_to_string(path)
                    .with_context(|| format!("read signing key file {}", path.display()))?;
                let bytes = BASE64
                    .decode(encoded.trim())
                    .with_context(|| format!("decode signing key file {}", path.display()))?;
                anyhow::ensure!(
                    bytes.len() == KEY_LEN,
                    "signing key file {} holds {} bytes, expected {}",
                    path.display(),
                    bytes.len(),
                    KEY_LEN
                );
                Ok(Self(bytes))
            }
            Some(path) => {
                let bytes = generate_key_bytes();
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent).with_context(|| {
                            format!("create signing key directory {}", parent.display())
                        })?;
                    }
                }
                fs::write(path, BASE64.encode(&bytes))
                    .with_context(|| format!("persist signing key to {}", path.display()))?;
                tracing::info!(path = %path.display(), "Generated and persisted new signing key");
                Ok(Self(bytes))
            }
            None => {
                tracing::warn!(
                    "No SIGNING_KEY_FILE configured; tokens will not survive a process restart"
                );
                Ok(Self(generate_key_bytes()))
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey(len={})", self.0.len())
    }
}

fn generate_key_bytes() -> Vec<u8> {
    let mut bytes = vec![0u8; KEY_LEN];
    OsRng.fill_bytes(&mut bytes);
    bytes
}
