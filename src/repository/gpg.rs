#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::path::Path;

use super::command::{run, run_with, RunOptions};
use super::error::Result;
use crate::shell::{Secret, SpaceDelimited};

/// Encrypts *from_file* to *to_file* with the public key *key_name*.
///
/// # Errors
/// Returns an error carrying gpg's stderr when the exit code is not zero.
pub fn encrypt(key_name: &str, from_file: &Path, to_file: &Path) -> Result<()> {
    let command = SpaceDelimited::new(vec![
        "gpg".into(),
        "--batch".into(),
        "--yes".into(),
        "--trust-model".into(),
        "always".into(),
        "--recipient".into(),
        key_name.into(),
        "--output".into(),
        to_file.display().to_string().into(),
        "--encrypt".into(),
        from_file.display().to_string().into(),
    ]);
    run(&command)?;
    Ok(())
}

/// Decrypts *from_file* to *to_file*.  The passphrase goes to gpg on
/// stdin, never on the argument vector.
///
/// # Errors
/// Returns an error carrying gpg's stderr when the exit code is not zero.
pub fn decrypt(passphrase: &Secret, from_file: &Path, to_file: &Path) -> Result<()> {
    let command = SpaceDelimited::new(vec![
        "gpg".into(),
        "--batch".into(),
        "--yes".into(),
        "--pinentry-mode".into(),
        "loopback".into(),
        "--passphrase-fd".into(),
        "0".into(),
        "--output".into(),
        to_file.display().to_string().into(),
        "--decrypt".into(),
        from_file.display().to_string().into(),
    ]);
    run_with(
        &command,
        RunOptions {
            stdin: Some(passphrase.clone().into()),
            ..RunOptions::default()
        },
    )?;
    Ok(())
}
