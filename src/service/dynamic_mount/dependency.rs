#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use crate::machine::{execute, NodeError, StepResult};
use crate::repository::mount;
use crate::service::actions::{MountAction, PathAction};
use crate::service::backup_databases::{
    DependencyBackupDatabases, MachineBackupDatabases, StateBackupDatabases,
};

/// Runs the nested per-client backup machine and yields its stream.
pub type BackupDatabasesRun =
    Box<dyn Fn(StateBackupDatabases) -> Result<Vec<StepResult>, NodeError>>;

/// Repository dependencies for [`MachineDynamicMount`].
///
/// [`MachineDynamicMount`]: super::MachineDynamicMount
pub struct DependencyDynamicMount {
    pub mount_file_share: MountAction,
    pub run_backup_databases: BackupDatabasesRun,
    pub unmount_file_share: PathAction,
}

impl DependencyDynamicMount {
    #[must_use]
    pub fn new() -> Self {
        Self {
            mount_file_share: Box::new(mount::mount_storage),
            run_backup_databases: Box::new(|state| {
                let mut machine =
                    MachineBackupDatabases::new(state, DependencyBackupDatabases::new());
                execute(&mut machine).map_err(NodeError::from)
            }),
            unmount_file_share: Box::new(mount::unmount_storage),
        }
    }
}

impl Default for DependencyDynamicMount {
    fn default() -> Self {
        Self::new()
    }
}
