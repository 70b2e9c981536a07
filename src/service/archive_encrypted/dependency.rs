#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use crate::repository::{file_manager, gpg};
use crate::service::actions::{EncryptAction, PathAction, TransferAction};

/// Repository dependencies for [`MachineArchiveEncrypted`].  Three of the
/// removal fields bind the same idempotent capability under different
/// per-node keys.
///
/// [`MachineArchiveEncrypted`]: super::MachineArchiveEncrypted
pub struct DependencyArchiveEncrypted {
    pub ensure_staging_directory: PathAction,
    pub copy_to_staging: TransferAction,
    pub encrypt_file: EncryptAction,
    pub remove_copied_file: PathAction,
    pub remove_encrypted_file: PathAction,
    pub ensure_archive_directory: PathAction,
    pub move_to_archive: TransferAction,
    pub remove_from_archive: PathAction,
}

impl DependencyArchiveEncrypted {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ensure_staging_directory: Box::new(file_manager::make_dir_if_not_exists),
            copy_to_staging: Box::new(file_manager::copy),
            encrypt_file: Box::new(gpg::encrypt),
            remove_copied_file: Box::new(file_manager::remove_file_if_exists),
            remove_encrypted_file: Box::new(file_manager::remove_file_if_exists),
            ensure_archive_directory: Box::new(file_manager::make_dir_if_not_exists),
            move_to_archive: Box::new(file_manager::move_file),
            remove_from_archive: Box::new(file_manager::remove_file_if_exists),
        }
    }
}

impl Default for DependencyArchiveEncrypted {
    fn default() -> Self {
        Self::new()
    }
}
