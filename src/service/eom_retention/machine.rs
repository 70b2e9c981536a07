#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::sync::LazyLock;

use crate::machine::{
    report_results, success, DefinitionError, Machine, MachineDefinition, NextStep, Node,
    NodeError,
};

use super::dependency::DependencyEomRetention;
use super::state::StateEomRetention;

const FIND_DELETION_CANDIDATES: &str = "find_deletion_candidates";
const REMOVE_EXPIRED_ARCHIVES: &str = "remove_expired_archives";
const REPORT_RESULTS: &str = "report_results";

const OVERVIEW: &str = "\
End-of-month retention sweep over a client's archive directory: find the \
encrypted backups older than the retention cutoff, keeping every \
month-end backup, then remove the expired ones.  Removal is idempotent, \
so a partially completed sweep can simply run again.";

/// Retention machine for one client's archive directory.
pub struct MachineEomRetention {
    state: StateEomRetention,
    dependency: DependencyEomRetention,
}

impl MachineEomRetention {
    #[must_use]
    pub fn new(state: StateEomRetention, dependency: DependencyEomRetention) -> Self {
        Self { state, dependency }
    }
}

fn find_deletion_candidates(machine: &mut MachineEomRetention) -> Result<NextStep, NodeError> {
    let candidates = (machine.dependency.find_deletion_candidates)(
        machine.state.archive_root(),
        machine.state.cutoff(),
    )?;
    machine.state.set_deletion_candidates(candidates);
    Ok(success(REMOVE_EXPIRED_ARCHIVES))
}

fn remove_expired_archives(machine: &mut MachineEomRetention) -> Result<NextStep, NodeError> {
    (machine.dependency.remove_expired_archives)(machine.state.deletion_candidates())?;
    Ok(success(REPORT_RESULTS))
}

static DEFINITION: LazyLock<Result<MachineDefinition<MachineEomRetention>, DefinitionError>> =
    LazyLock::new(|| {
        MachineDefinition::new(
            "MachineEomRetention",
            OVERVIEW,
            vec![
                Node::new(
                    FIND_DELETION_CANDIDATES,
                    "Collect the expired archives, keeping month-end backups.",
                    find_deletion_candidates,
                )
                .entry()
                .happy(&[REMOVE_EXPIRED_ARCHIVES])
                .unhappy(&[REPORT_RESULTS])
                .on_exception(REPORT_RESULTS),
                Node::new(
                    REMOVE_EXPIRED_ARCHIVES,
                    "Remove the collected archives.",
                    remove_expired_archives,
                )
                .happy(&[REPORT_RESULTS])
                .unhappy(&[REPORT_RESULTS])
                .on_exception(REPORT_RESULTS),
                report_results(),
            ],
        )
    });

impl Machine for MachineEomRetention {
    fn definition() -> &'static Result<MachineDefinition<Self>, DefinitionError> {
        &DEFINITION
    }

    fn failure_prefix(&self) -> String {
        format!("{} end-of-month retention", self.state.client())
    }
}
