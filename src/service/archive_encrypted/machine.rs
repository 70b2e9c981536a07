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

use super::dependency::DependencyArchiveEncrypted;
use super::state::StateArchiveEncrypted;

const ENSURE_STAGING_DIRECTORY: &str = "ensure_staging_directory";
const COPY_TO_STAGING: &str = "copy_to_staging";
const ENCRYPT_FILE: &str = "encrypt_file";
const ENSURE_ARCHIVE_DIRECTORY: &str = "ensure_archive_directory";
const MOVE_TO_ARCHIVE: &str = "move_to_archive";
const REMOVE_COPIED_FILE: &str = "remove_copied_file";
const REMOVE_ENCRYPTED_FILE: &str = "remove_encrypted_file";
const REPORT_RESULTS: &str = "report_results";

const OVERVIEW: &str = "\
Archive a file by copying it to a staging folder, encrypting it with GPG, \
and moving the encrypted file to an archive folder.  The rollback nodes \
remove the copied and encrypted files, so a failed run leaves the staging \
folder clean.";

/// Archive-and-encrypt machine for a single file.
pub struct MachineArchiveEncrypted {
    state: StateArchiveEncrypted,
    dependency: DependencyArchiveEncrypted,
}

impl MachineArchiveEncrypted {
    #[must_use]
    pub fn new(state: StateArchiveEncrypted, dependency: DependencyArchiveEncrypted) -> Self {
        Self { state, dependency }
    }
}

fn ensure_staging_directory(machine: &mut MachineArchiveEncrypted) -> Result<NextStep, NodeError> {
    (machine.dependency.ensure_staging_directory)(machine.state.staging_folder())?;
    Ok(success(COPY_TO_STAGING))
}

fn copy_to_staging(machine: &mut MachineArchiveEncrypted) -> Result<NextStep, NodeError> {
    (machine.dependency.copy_to_staging)(
        machine.state.source_path(),
        &machine.state.staging_file_path(),
    )?;
    Ok(success(ENCRYPT_FILE))
}

fn encrypt_file(machine: &mut MachineArchiveEncrypted) -> Result<NextStep, NodeError> {
    (machine.dependency.encrypt_file)(
        machine.state.gpg_key_name(),
        &machine.state.staging_file_path(),
        &machine.state.encrypted_file_path(),
    )?;
    Ok(success(ENSURE_ARCHIVE_DIRECTORY))
}

fn ensure_archive_directory(machine: &mut MachineArchiveEncrypted) -> Result<NextStep, NodeError> {
    (machine.dependency.ensure_archive_directory)(machine.state.archive_folder())?;
    Ok(success(MOVE_TO_ARCHIVE))
}

fn move_to_archive(machine: &mut MachineArchiveEncrypted) -> Result<NextStep, NodeError> {
    (machine.dependency.move_to_archive)(
        &machine.state.encrypted_file_path(),
        &machine.state.archive_encrypted_path(),
    )?;
    Ok(success(REPORT_RESULTS))
}

fn remove_copied_file(machine: &mut MachineArchiveEncrypted) -> Result<NextStep, NodeError> {
    (machine.dependency.remove_copied_file)(&machine.state.staging_file_path())?;
    Ok(success(REPORT_RESULTS))
}

fn remove_encrypted_file(machine: &mut MachineArchiveEncrypted) -> Result<NextStep, NodeError> {
    (machine.dependency.remove_encrypted_file)(&machine.state.encrypted_file_path())?;
    // A partially completed move may have landed in the archive already.
    (machine.dependency.remove_from_archive)(&machine.state.archive_encrypted_path())?;
    Ok(success(REMOVE_COPIED_FILE))
}

static DEFINITION: LazyLock<Result<MachineDefinition<MachineArchiveEncrypted>, DefinitionError>> =
    LazyLock::new(|| {
        MachineDefinition::new(
            "MachineArchiveEncrypted",
            OVERVIEW,
            vec![
                Node::new(
                    ENSURE_STAGING_DIRECTORY,
                    "Ensure the staging directory exists.",
                    ensure_staging_directory,
                )
                .entry()
                .happy(&[COPY_TO_STAGING])
                .unhappy(&[REPORT_RESULTS])
                .on_exception(REPORT_RESULTS),
                Node::new(
                    COPY_TO_STAGING,
                    "Copy the source file to the staging folder.",
                    copy_to_staging,
                )
                .happy(&[ENCRYPT_FILE])
                .unhappy(&[REMOVE_COPIED_FILE])
                .on_exception(REMOVE_COPIED_FILE),
                Node::new(
                    ENCRYPT_FILE,
                    "Encrypt the staged file with GPG.",
                    encrypt_file,
                )
                .happy(&[ENSURE_ARCHIVE_DIRECTORY])
                .unhappy(&[REMOVE_COPIED_FILE])
                .on_exception(REMOVE_COPIED_FILE),
                Node::new(
                    ENSURE_ARCHIVE_DIRECTORY,
                    "Ensure the archive directory exists.",
                    ensure_archive_directory,
                )
                .happy(&[MOVE_TO_ARCHIVE])
                .unhappy(&[REMOVE_ENCRYPTED_FILE])
                .on_exception(REMOVE_ENCRYPTED_FILE),
                Node::new(
                    MOVE_TO_ARCHIVE,
                    "Move the encrypted file from staging to the archive folder.",
                    move_to_archive,
                )
                .happy(&[REPORT_RESULTS])
                .unhappy(&[REMOVE_ENCRYPTED_FILE])
                .on_exception(REMOVE_ENCRYPTED_FILE),
                Node::new(
                    REMOVE_COPIED_FILE,
                    "Remove the copied file from staging.",
                    remove_copied_file,
                )
                .happy(&[REPORT_RESULTS])
                .unhappy(&[REPORT_RESULTS])
                .on_exception(REPORT_RESULTS),
                Node::new(
                    REMOVE_ENCRYPTED_FILE,
                    "Remove the encrypted file from staging and any partial move from the archive.",
                    remove_encrypted_file,
                )
                .happy(&[REMOVE_COPIED_FILE])
                .unhappy(&[REMOVE_COPIED_FILE])
                .on_exception(REMOVE_COPIED_FILE),
                report_results(),
            ],
        )
    });

impl Machine for MachineArchiveEncrypted {
    fn definition() -> &'static Result<MachineDefinition<Self>, DefinitionError> {
        &DEFINITION
    }

    fn failure_prefix(&self) -> String {
        format!("archive {}", self.state.source_path().display())
    }
}
