#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Capability signatures shared by the dependency records.  Each field of
//! a dependency record is named after the node that calls it, so a test
//! can substitute behavior at the granularity of a single call site.

use std::path::{Path, PathBuf};

use crate::repository::{self, Connection};
use crate::shell::Secret;

/// Acts on a single filesystem path (create, remove, ...).
pub type PathAction = Box<dyn Fn(&Path) -> repository::Result<()>>;

/// Moves or copies content between two paths.
pub type TransferAction = Box<dyn Fn(&Path, &Path) -> repository::Result<()>>;

/// Dumps one aspect of a database to a file.
pub type DumpAction = Box<dyn Fn(&Connection, &Path) -> repository::Result<()>>;

/// Tars a directory (named relative to the first path) into a tarball.
pub type CompressAction = Box<dyn Fn(&Path, &str, &str) -> repository::Result<()>>;

/// Encrypts a file to a target path with the named public key.
pub type EncryptAction = Box<dyn Fn(&str, &Path, &Path) -> repository::Result<()>>;

/// Lists the databases visible through a connection.
pub type ListDatabasesAction = Box<dyn Fn(&Connection) -> repository::Result<Vec<String>>>;

/// Collects the archive files eligible for deletion under a root, given
/// the retention cutoff.
pub type FindCandidatesAction =
    Box<dyn Fn(&Path, chrono::DateTime<chrono::Utc>) -> repository::Result<Vec<PathBuf>>>;

/// Removes a batch of files.
pub type RemoveBatchAction = Box<dyn Fn(&[PathBuf]) -> repository::Result<()>>;

/// Mounts a file share with credentials.
pub type MountAction = Box<dyn Fn(&str, &Path, &str, &Secret) -> repository::Result<()>>;
