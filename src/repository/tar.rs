#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::path::Path;

use super::command::{run_with, RunOptions};
use super::error::Result;
use crate::shell::SpaceDelimited;

/// Tars *directory_to_tar* (relative to *directory_to_run_in*) into
/// *tarball* with bzip compression, removing the source files when the
/// archive is complete.
///
/// # Errors
/// Returns an error carrying tar's stderr when the exit code is not zero.
pub fn cjf_with_removal(
    directory_to_run_in: &Path,
    directory_to_tar: &str,
    tarball: &str,
) -> Result<()> {
    let command = SpaceDelimited::new(vec![
        "tar".into(),
        "-cjf".into(),
        tarball.into(),
        directory_to_tar.into(),
        "--remove-files".into(),
    ]);
    run_with(
        &command,
        RunOptions {
            cwd: Some(directory_to_run_in.to_path_buf()),
            ..RunOptions::default()
        },
    )?;
    Ok(())
}

/// Untars the bzip-compressed *tarball* into *path*.
///
/// # Errors
/// Returns an error carrying tar's stderr when the exit code is not zero.
pub fn xjf(tarball: &Path, path: &Path) -> Result<()> {
    let command = SpaceDelimited::new(vec![
        "tar".into(),
        "-xjf".into(),
        tarball.display().to_string().into(),
        "-C".into(),
        path.display().to_string().into(),
    ]);
    super::command::run(&command)?;
    Ok(())
}
