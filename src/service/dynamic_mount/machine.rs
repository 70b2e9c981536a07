#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::sync::LazyLock;

use crate::machine::{
    invoked, report_results, success, DefinitionError, Machine, MachineDefinition, NextStep,
    Node, NodeError,
};

use super::dependency::DependencyDynamicMount;
use super::state::StateDynamicMount;

const MOUNT_FILE_SHARE: &str = "mount_file_share";
const RUN_BACKUP_DATABASES: &str = "run_backup_databases";
const UNMOUNT_FILE_SHARE: &str = "unmount_file_share";
const REPORT_RESULTS: &str = "report_results";

const OVERVIEW: &str = "\
Mount the backup file share, run the per-client backup workflow against \
it, and unmount.  The unmount node sits on every path out of the backup, \
so the share never stays mounted past the run.";

/// Mount-wrapped execution of the per-client backup workflow.
pub struct MachineDynamicMount {
    state: StateDynamicMount,
    dependency: DependencyDynamicMount,
}

impl MachineDynamicMount {
    #[must_use]
    pub fn new(state: StateDynamicMount, dependency: DependencyDynamicMount) -> Self {
        Self { state, dependency }
    }
}

fn mount_file_share(machine: &mut MachineDynamicMount) -> Result<NextStep, NodeError> {
    (machine.dependency.mount_file_share)(
        machine.state.unc(),
        machine.state.mount_point(),
        machine.state.account_name(),
        machine.state.account_key(),
    )?;
    Ok(success(RUN_BACKUP_DATABASES))
}

fn run_backup_databases(machine: &mut MachineDynamicMount) -> Result<NextStep, NodeError> {
    let backup_state = machine
        .state
        .take_backup_state()
        .ok_or_else(|| NodeError::message("backup state already consumed"))?;
    let results = (machine.dependency.run_backup_databases)(backup_state)?;
    Ok(invoked(results, UNMOUNT_FILE_SHARE))
}

fn unmount_file_share(machine: &mut MachineDynamicMount) -> Result<NextStep, NodeError> {
    (machine.dependency.unmount_file_share)(machine.state.mount_point())?;
    Ok(success(REPORT_RESULTS))
}

static DEFINITION: LazyLock<Result<MachineDefinition<MachineDynamicMount>, DefinitionError>> =
    LazyLock::new(|| {
        MachineDefinition::new(
            "MachineDynamicMount",
            OVERVIEW,
            vec![
                Node::new(
                    MOUNT_FILE_SHARE,
                    "Mount the backup file share.",
                    mount_file_share,
                )
                .entry()
                .happy(&[RUN_BACKUP_DATABASES])
                .unhappy(&[REPORT_RESULTS])
                .on_exception(REPORT_RESULTS),
                Node::new(
                    RUN_BACKUP_DATABASES,
                    "Run the per-client backup workflow against the mounted share.",
                    run_backup_databases,
                )
                .invokes("MachineBackupDatabases")
                .happy(&[UNMOUNT_FILE_SHARE])
                .unhappy(&[UNMOUNT_FILE_SHARE])
                .on_exception(UNMOUNT_FILE_SHARE),
                Node::new(
                    UNMOUNT_FILE_SHARE,
                    "Unmount the backup file share.",
                    unmount_file_share,
                )
                .happy(&[REPORT_RESULTS])
                .unhappy(&[REPORT_RESULTS])
                .on_exception(REPORT_RESULTS),
                report_results(),
            ],
        )
    });

impl Machine for MachineDynamicMount {
    fn definition() -> &'static Result<MachineDefinition<Self>, DefinitionError> {
        &DEFINITION
    }

    fn failure_prefix(&self) -> String {
        format!("{} mount", self.state.unc())
    }
}
