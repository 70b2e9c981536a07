#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use fernet::Fernet;

use super::error::{ConfigError, Result};

/// The keyfile installed on every host that decrypts configuration.
pub const DEFAULT_KEY_FILE: &str = "/etc/fernet.key";

/// Symmetric authenticated encryption over configuration values, keyed
/// from an on-disk keyfile.
pub struct Encryption {
    fernet: Fernet,
}

impl Encryption {
    /// # Errors
    /// Returns an error if the keyfile cannot be read or does not hold a
    /// well-formed key.
    pub fn from_key_file(path: &Path) -> Result<Self> {
        let key = fs::read_to_string(path)
            .map_err(|cause| ConfigError::KeyFile(format!("{}: {cause}", path.display())))?;
        let fernet = Fernet::new(key.trim()).ok_or_else(|| {
            ConfigError::KeyFile(format!("{} does not hold a valid key", path.display()))
        })?;
        Ok(Self { fernet })
    }

    #[must_use]
    pub fn encrypt(&self, value: &str) -> String {
        self.fernet.encrypt(value.as_bytes())
    }

    /// # Errors
    /// Returns `ConfigError::Decrypt` when the token was not produced by
    /// this key or has been tampered with; *path* names the offending
    /// configuration entry.
    pub fn decrypt(&self, token: &str, path: &str) -> Result<String> {
        let clear = self.fernet.decrypt(token).map_err(|_| ConfigError::Decrypt {
            path: path.to_string(),
        })?;
        String::from_utf8(clear).map_err(|_| ConfigError::Decrypt {
            path: path.to_string(),
        })
    }
}

/// Writes a fresh key to *path* in the format the encryption layer
/// expects.  Refuses to overwrite an existing key.
///
/// # Errors
/// Returns an error if *path* already exists or cannot be written.
pub fn generate_key_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(ConfigError::KeyFile(format!(
            "{} already exists",
            path.display()
        )));
    }
    fs::write(path, Fernet::generate_key())?;
    Ok(())
}
