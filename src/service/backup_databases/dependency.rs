#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use crate::machine::{execute, NodeError, StepResult};
use crate::repository::psql;
use crate::service::actions::ListDatabasesAction;
use crate::service::backup_database::{
    DependencyBackupDatabase, MachineBackupDatabase, StateBackupDatabase,
};
use crate::service::eom_retention::{
    DependencyEomRetention, MachineEomRetention, StateEomRetention,
};

/// Runs the nested backup machine for one database and yields its stream.
pub type BackupDatabaseRun =
    Box<dyn Fn(StateBackupDatabase) -> Result<Vec<StepResult>, NodeError>>;

/// Runs the nested retention machine and yields its stream.
pub type EomRetentionRun = Box<dyn Fn(StateEomRetention) -> Result<Vec<StepResult>, NodeError>>;

/// Repository dependencies for [`MachineBackupDatabases`].  The nested
/// machines enter through factory fields so a test can substitute a
/// canned stream for a whole sub-machine.
///
/// [`MachineBackupDatabases`]: super::MachineBackupDatabases
pub struct DependencyBackupDatabases {
    pub fetch_databases: ListDatabasesAction,
    pub backup_database: BackupDatabaseRun,
    pub end_of_month_retention: EomRetentionRun,
}

impl DependencyBackupDatabases {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fetch_databases: Box::new(psql::list_databases),
            backup_database: Box::new(|state| {
                let mut machine =
                    MachineBackupDatabase::new(state, DependencyBackupDatabase::new());
                execute(&mut machine).map_err(NodeError::from)
            }),
            end_of_month_retention: Box::new(|state| {
                let mut machine = MachineEomRetention::new(state, DependencyEomRetention::new());
                execute(&mut machine).map_err(NodeError::from)
            }),
        }
    }
}

impl Default for DependencyBackupDatabases {
    fn default() -> Self {
        Self::new()
    }
}
