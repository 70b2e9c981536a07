#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::error::Result;

fn observed<T>(operation: &str, path: &Path, action: impl FnOnce() -> Result<T>) -> Result<T> {
    let started = Instant::now();
    debug!("  {operation} {} - started", path.display());
    let outcome = action()?;
    debug!(
        "  {operation} {} - completed - runtime: {:?}",
        path.display(),
        started.elapsed()
    );
    Ok(outcome)
}

/// Creates the full directory *path*, doing nothing if it already exists.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn make_dir_if_not_exists(path: &Path) -> Result<()> {
    observed("make_dir_if_not_exists", path, || {
        fs::create_dir_all(path)?;
        Ok(())
    })
}

/// Removes the file at *path* if it exists, otherwise does nothing.
///
/// # Errors
/// Returns an error if an existing file cannot be removed.
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    observed("remove_file_if_exists", path, || {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    })
}

/// Removes the empty directory at *path* if it exists, otherwise does
/// nothing.
///
/// # Errors
/// Returns an error if an existing directory cannot be removed.
pub fn remove_directory_if_exists(path: &Path) -> Result<()> {
    observed("remove_directory_if_exists", path, || {
        if path.exists() {
            fs::remove_dir(path)?;
        }
        Ok(())
    })
}

/// # Errors
/// Returns an error if the copy fails.
pub fn copy(from: &Path, to: &Path) -> Result<()> {
    observed("copy", from, || {
        fs::copy(from, to)?;
        Ok(())
    })
}

/// # Errors
/// Returns an error if the rename fails.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    observed("move", from, || {
        fs::rename(from, to)?;
        Ok(())
    })
}

#[must_use]
pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Recursively walks *path* and returns every file found beneath it.
///
/// # Errors
/// Returns an error if a directory cannot be read.
pub fn all_files_in_directory(path: &Path) -> Result<Vec<PathBuf>> {
    observed("all_files_in_directory", path, || {
        let mut found = Vec::new();
        collect_files(path, &mut found)?;
        Ok(found)
    })
}

fn collect_files(path: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();
        if entry_path.is_dir() {
            collect_files(&entry_path, found)?;
        } else {
            found.push(entry_path);
        }
    }
    Ok(())
}

/// # Errors
/// Returns an error if the file's metadata cannot be read.
pub fn modification_time(path: &Path) -> Result<DateTime<Utc>> {
    observed("modification_time", path, || {
        let modified = fs::metadata(path)?.modified()?;
        Ok(DateTime::<Utc>::from(modified))
    })
}
