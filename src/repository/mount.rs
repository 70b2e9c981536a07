#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::path::Path;

use super::command::run;
use super::error::Result;
use crate::shell::{CommaDelimited, EqualDelimited, Secret, SpaceDelimited};

/// Mounts the CIFS share *unc* at *mount_path*.  The account key rides
/// inside the option list as a masking fragment, so the mount command is
/// loggable as-is.
///
/// # Errors
/// Returns an error carrying mount's stderr when the exit code is not
/// zero.
pub fn mount_storage(
    unc: &str,
    mount_path: &Path,
    account_name: &str,
    account_key: &Secret,
) -> Result<()> {
    let command = SpaceDelimited::new(vec![
        "mount".into(),
        "-t".into(),
        "cifs".into(),
        unc.into(),
        mount_path.display().to_string().into(),
        "-o".into(),
        CommaDelimited::new(vec![
            EqualDelimited::new("username", account_name).into(),
            EqualDelimited::new("password", account_key.clone()).into(),
            "serverino".into(),
            "nosharesock".into(),
            EqualDelimited::new("actimeo", "30").into(),
            "mfsymlinks".into(),
        ])
        .into(),
    ]);
    run(&command)?;
    Ok(())
}

/// Lazily unmounts *mount_path*.
///
/// # Errors
/// Returns an error carrying umount's stderr when the exit code is not
/// zero.
pub fn unmount_storage(mount_path: &Path) -> Result<()> {
    let command = SpaceDelimited::new(vec![
        "umount".into(),
        "-l".into(),
        mount_path.display().to_string().into(),
    ]);
    run(&command)?;
    Ok(())
}

/// Reports whether *path* sits on a mounted file share.
///
/// # Errors
/// Returns an error when findmnt cannot inspect the path.
pub fn is_mounted(path: &Path) -> Result<bool> {
    let command = SpaceDelimited::new(vec![
        "findmnt".into(),
        "-T".into(),
        path.display().to_string().into(),
        "--noheadings".into(),
        "--output".into(),
        "SOURCE".into(),
    ]);
    let output = run(&command)?;
    Ok(output.stdout.trim().starts_with("//"))
}
