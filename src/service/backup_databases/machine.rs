#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::sync::LazyLock;

use crate::machine::{
    failure, invoked, report_results, success, DefinitionError, Machine, MachineDefinition,
    NextStep, Node, NodeError,
};

use super::dependency::DependencyBackupDatabases;
use super::state::StateBackupDatabases;

const FETCH_DATABASES: &str = "fetch_databases";
const BACKUP_DATABASES: &str = "backup_databases";
const END_OF_MONTH_RETENTION: &str = "end_of_month_retention";
const REPORT_RESULTS: &str = "report_results";

const OVERVIEW: &str = "\
Per-client backup workflow: discover the databases on the client's \
instance, run the backup-and-encrypt machine for each one, then run the \
end-of-month retention sweep over the client's archive.  Nested failures \
ride along in the result stream without stopping the outer machine, so \
one broken database never blocks the others or the retention sweep.";

/// The per-client workflow machine, composing the nested backup and
/// retention machines.
pub struct MachineBackupDatabases {
    state: StateBackupDatabases,
    dependency: DependencyBackupDatabases,
}

impl MachineBackupDatabases {
    #[must_use]
    pub fn new(state: StateBackupDatabases, dependency: DependencyBackupDatabases) -> Self {
        Self { state, dependency }
    }
}

fn fetch_databases(machine: &mut MachineBackupDatabases) -> Result<NextStep, NodeError> {
    let databases = (machine.dependency.fetch_databases)(machine.state.connection())?;
    if databases.is_empty() {
        return Ok(failure(END_OF_MONTH_RETENTION, "no databases to backup"));
    }
    machine.state.set_databases(databases);
    Ok(success(BACKUP_DATABASES))
}

fn backup_databases(machine: &mut MachineBackupDatabases) -> Result<NextStep, NodeError> {
    let mut spliced = Vec::new();
    for database in machine.state.databases().to_vec() {
        let state = machine.state.backup_state_for(&database);
        spliced.extend((machine.dependency.backup_database)(state)?);
    }
    Ok(invoked(spliced, END_OF_MONTH_RETENTION))
}

fn end_of_month_retention(machine: &mut MachineBackupDatabases) -> Result<NextStep, NodeError> {
    let results = (machine.dependency.end_of_month_retention)(machine.state.retention_state())?;
    Ok(invoked(results, REPORT_RESULTS))
}

static DEFINITION: LazyLock<Result<MachineDefinition<MachineBackupDatabases>, DefinitionError>> =
    LazyLock::new(|| {
        MachineDefinition::new(
            "MachineBackupDatabases",
            OVERVIEW,
            vec![
                Node::new(
                    FETCH_DATABASES,
                    "Discover the databases on the client's instance.",
                    fetch_databases,
                )
                .entry()
                .happy(&[BACKUP_DATABASES])
                .unhappy(&[END_OF_MONTH_RETENTION])
                .on_exception(END_OF_MONTH_RETENTION),
                Node::new(
                    BACKUP_DATABASES,
                    "Back up each discovered database through the nested machine.",
                    backup_databases,
                )
                .invokes("MachineBackupDatabase")
                .happy(&[END_OF_MONTH_RETENTION])
                .unhappy(&[END_OF_MONTH_RETENTION])
                .on_exception(END_OF_MONTH_RETENTION),
                Node::new(
                    END_OF_MONTH_RETENTION,
                    "Run the retention sweep over the client's archive.",
                    end_of_month_retention,
                )
                .invokes("MachineEomRetention")
                .happy(&[REPORT_RESULTS])
                .unhappy(&[REPORT_RESULTS])
                .on_exception(REPORT_RESULTS),
                report_results(),
            ],
        )
    });

impl Machine for MachineBackupDatabases {
    fn definition() -> &'static Result<MachineDefinition<Self>, DefinitionError> {
        &DEFINITION
    }

    fn failure_prefix(&self) -> String {
        format!(
            "{} {}",
            self.state.client(),
            self.state.connection().host
        )
    }
}
