#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use crate::repository::{file_manager, gpg, pg_dump, tar};
use crate::service::actions::{
    CompressAction, DumpAction, EncryptAction, PathAction, TransferAction,
};

/// Repository dependencies for [`MachineBackupDatabase`], one field per
/// node.  Several fields bind the same underlying capability; the
/// per-node keys are what let a test fail `create_pg_dump_directory`
/// without touching `create_intermediate_directory`.
///
/// [`MachineBackupDatabase`]: super::MachineBackupDatabase
pub struct DependencyBackupDatabase {
    pub create_intermediate_directory: PathAction,
    pub create_pg_dump_directory: PathAction,
    pub backup_schema: DumpAction,
    pub backup_data: DumpAction,
    pub compress: CompressAction,
    pub encrypt: EncryptAction,
    pub create_storage_directory: PathAction,
    pub move_backup: TransferAction,
    pub remove_encrypted_backup: PathAction,
    pub remove_tarball: PathAction,
    pub remove_data_file: PathAction,
    pub remove_schema_file: PathAction,
    pub remove_pg_dump_directory: PathAction,
    pub remove_intermediate_directory: PathAction,
}

impl DependencyBackupDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self {
            create_intermediate_directory: Box::new(file_manager::make_dir_if_not_exists),
            create_pg_dump_directory: Box::new(file_manager::make_dir_if_not_exists),
            backup_schema: Box::new(pg_dump::dump_schema),
            backup_data: Box::new(pg_dump::dump_data),
            compress: Box::new(tar::cjf_with_removal),
            encrypt: Box::new(gpg::encrypt),
            create_storage_directory: Box::new(file_manager::make_dir_if_not_exists),
            move_backup: Box::new(file_manager::move_file),
            remove_encrypted_backup: Box::new(file_manager::remove_file_if_exists),
            remove_tarball: Box::new(file_manager::remove_file_if_exists),
            remove_data_file: Box::new(file_manager::remove_file_if_exists),
            remove_schema_file: Box::new(file_manager::remove_file_if_exists),
            remove_pg_dump_directory: Box::new(file_manager::remove_directory_if_exists),
            remove_intermediate_directory: Box::new(file_manager::remove_directory_if_exists),
        }
    }
}

impl Default for DependencyBackupDatabase {
    fn default() -> Self {
        Self::new()
    }
}
