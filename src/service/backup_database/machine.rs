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

use super::dependency::DependencyBackupDatabase;
use super::state::StateBackupDatabase;

const CREATE_INTERMEDIATE_DIRECTORY: &str = "create_intermediate_directory";
const CREATE_PG_DUMP_DIRECTORY: &str = "create_pg_dump_directory";
const BACKUP_SCHEMA: &str = "backup_schema";
const BACKUP_DATA: &str = "backup_data";
const COMPRESS: &str = "compress";
const ENCRYPT: &str = "encrypt";
const CREATE_STORAGE_DIRECTORY: &str = "create_storage_directory";
const MOVE_BACKUP: &str = "move_backup";
const REMOVE_ENCRYPTED_BACKUP: &str = "remove_encrypted_backup";
const REMOVE_TARBALL: &str = "remove_tarball";
const REMOVE_DATA_FILE: &str = "remove_data_file";
const REMOVE_SCHEMA_FILE: &str = "remove_schema_file";
const REMOVE_PG_DUMP_DIRECTORY: &str = "remove_pg_dump_directory";
const REMOVE_INTERMEDIATE_DIRECTORY: &str = "remove_intermediate_directory";
const REPORT_RESULTS: &str = "report_results";

const OVERVIEW: &str = "\
Backs up one database to long-term storage: dump schema and data with \
pg_dump into a per-run intermediate directory, tar the dumps, encrypt the \
tarball with GPG, and move the encrypted backup into the client's storage \
directory.  The cleanup chain removes every intermediate artifact and is \
entered at the matching depth by every unhappy path, so a failed run \
leaves nothing behind.";

/// Backup-and-encrypt machine for a single database.
pub struct MachineBackupDatabase {
    state: StateBackupDatabase,
    dependency: DependencyBackupDatabase,
}

impl MachineBackupDatabase {
    #[must_use]
    pub fn new(state: StateBackupDatabase, dependency: DependencyBackupDatabase) -> Self {
        Self { state, dependency }
    }
}

fn create_intermediate_directory(
    machine: &mut MachineBackupDatabase,
) -> Result<NextStep, NodeError> {
    (machine.dependency.create_intermediate_directory)(&machine.state.intermediate_dir())?;
    Ok(success(CREATE_PG_DUMP_DIRECTORY))
}

fn create_pg_dump_directory(machine: &mut MachineBackupDatabase) -> Result<NextStep, NodeError> {
    (machine.dependency.create_pg_dump_directory)(&machine.state.pg_dump_dir())?;
    Ok(success(BACKUP_SCHEMA))
}

fn backup_schema(machine: &mut MachineBackupDatabase) -> Result<NextStep, NodeError> {
    (machine.dependency.backup_schema)(machine.state.connection(), &machine.state.schema_file())?;
    Ok(success(BACKUP_DATA))
}

fn backup_data(machine: &mut MachineBackupDatabase) -> Result<NextStep, NodeError> {
    (machine.dependency.backup_data)(machine.state.connection(), &machine.state.data_file())?;
    Ok(success(COMPRESS))
}

fn compress(machine: &mut MachineBackupDatabase) -> Result<NextStep, NodeError> {
    (machine.dependency.compress)(
        &machine.state.intermediate_dir(),
        StateBackupDatabase::pg_dump_dir_name(),
        &machine.state.tarball_name(),
    )?;
    Ok(success(ENCRYPT))
}

fn encrypt(machine: &mut MachineBackupDatabase) -> Result<NextStep, NodeError> {
    (machine.dependency.encrypt)(
        machine.state.gpg_key_name(),
        &machine.state.tarball_path(),
        &machine.state.encrypted_path(),
    )?;
    Ok(success(CREATE_STORAGE_DIRECTORY))
}

fn create_storage_directory(machine: &mut MachineBackupDatabase) -> Result<NextStep, NodeError> {
    (machine.dependency.create_storage_directory)(&machine.state.storage_dir())?;
    Ok(success(MOVE_BACKUP))
}

fn move_backup(machine: &mut MachineBackupDatabase) -> Result<NextStep, NodeError> {
    (machine.dependency.move_backup)(
        &machine.state.encrypted_path(),
        &machine.state.storage_path(),
    )?;
    Ok(success(REMOVE_ENCRYPTED_BACKUP))
}

fn remove_encrypted_backup(machine: &mut MachineBackupDatabase) -> Result<NextStep, NodeError> {
    (machine.dependency.remove_encrypted_backup)(&machine.state.encrypted_path())?;
    Ok(success(REMOVE_TARBALL))
}

fn remove_tarball(machine: &mut MachineBackupDatabase) -> Result<NextStep, NodeError> {
    (machine.dependency.remove_tarball)(&machine.state.tarball_path())?;
    Ok(success(REMOVE_DATA_FILE))
}

fn remove_data_file(machine: &mut MachineBackupDatabase) -> Result<NextStep, NodeError> {
    (machine.dependency.remove_data_file)(&machine.state.data_file())?;
    Ok(success(REMOVE_SCHEMA_FILE))
}

fn remove_schema_file(machine: &mut MachineBackupDatabase) -> Result<NextStep, NodeError> {
    (machine.dependency.remove_schema_file)(&machine.state.schema_file())?;
    Ok(success(REMOVE_PG_DUMP_DIRECTORY))
}

fn remove_pg_dump_directory(machine: &mut MachineBackupDatabase) -> Result<NextStep, NodeError> {
    (machine.dependency.remove_pg_dump_directory)(&machine.state.pg_dump_dir())?;
    Ok(success(REMOVE_INTERMEDIATE_DIRECTORY))
}

fn remove_intermediate_directory(
    machine: &mut MachineBackupDatabase,
) -> Result<NextStep, NodeError> {
    (machine.dependency.remove_intermediate_directory)(&machine.state.intermediate_dir())?;
    Ok(success(REPORT_RESULTS))
}

static DEFINITION: LazyLock<Result<MachineDefinition<MachineBackupDatabase>, DefinitionError>> =
    LazyLock::new(|| {
        MachineDefinition::new(
            "MachineBackupDatabase",
            OVERVIEW,
            vec![
                Node::new(
                    CREATE_INTERMEDIATE_DIRECTORY,
                    "Create the per-run working directory on the intermediate share.",
                    create_intermediate_directory,
                )
                .entry()
                .happy(&[CREATE_PG_DUMP_DIRECTORY])
                .unhappy(&[REMOVE_INTERMEDIATE_DIRECTORY])
                .on_exception(REMOVE_INTERMEDIATE_DIRECTORY),
                Node::new(
                    CREATE_PG_DUMP_DIRECTORY,
                    "Create the directory the dumps are written into.",
                    create_pg_dump_directory,
                )
                .happy(&[BACKUP_SCHEMA])
                .unhappy(&[REMOVE_PG_DUMP_DIRECTORY])
                .on_exception(REMOVE_PG_DUMP_DIRECTORY),
                Node::new(
                    BACKUP_SCHEMA,
                    "Dump the database schema, without ownership, to schema.sql.",
                    backup_schema,
                )
                .happy(&[BACKUP_DATA])
                .unhappy(&[REMOVE_SCHEMA_FILE])
                .on_exception(REMOVE_SCHEMA_FILE),
                Node::new(
                    BACKUP_DATA,
                    "Dump the database contents to data.sql.",
                    backup_data,
                )
                .happy(&[COMPRESS])
                .unhappy(&[REMOVE_DATA_FILE])
                .on_exception(REMOVE_DATA_FILE),
                Node::new(
                    COMPRESS,
                    "Tar the dump directory into a bzip-compressed tarball, removing the dumps.",
                    compress,
                )
                .happy(&[ENCRYPT])
                .unhappy(&[REMOVE_TARBALL])
                .on_exception(REMOVE_TARBALL),
                Node::new(
                    ENCRYPT,
                    "Encrypt the tarball with the client's public GPG key.",
                    encrypt,
                )
                .happy(&[CREATE_STORAGE_DIRECTORY])
                .unhappy(&[REMOVE_ENCRYPTED_BACKUP])
                .on_exception(REMOVE_ENCRYPTED_BACKUP),
                Node::new(
                    CREATE_STORAGE_DIRECTORY,
                    "Create the client's directory in long-term storage.",
                    create_storage_directory,
                )
                .happy(&[MOVE_BACKUP])
                .unhappy(&[REMOVE_ENCRYPTED_BACKUP])
                .on_exception(REMOVE_ENCRYPTED_BACKUP),
                Node::new(
                    MOVE_BACKUP,
                    "Move the encrypted backup into long-term storage.",
                    move_backup,
                )
                .happy(&[REMOVE_ENCRYPTED_BACKUP])
                .unhappy(&[REMOVE_ENCRYPTED_BACKUP])
                .on_exception(REMOVE_ENCRYPTED_BACKUP),
                Node::new(
                    REMOVE_ENCRYPTED_BACKUP,
                    "Remove the encrypted tarball from the intermediate directory.",
                    remove_encrypted_backup,
                )
                .happy(&[REMOVE_TARBALL])
                .unhappy(&[REMOVE_TARBALL])
                .on_exception(REMOVE_TARBALL),
                Node::new(
                    REMOVE_TARBALL,
                    "Remove the cleartext tarball.",
                    remove_tarball,
                )
                .happy(&[REMOVE_DATA_FILE])
                .unhappy(&[REMOVE_DATA_FILE])
                .on_exception(REMOVE_DATA_FILE),
                Node::new(
                    REMOVE_DATA_FILE,
                    "Remove the data dump.",
                    remove_data_file,
                )
                .happy(&[REMOVE_SCHEMA_FILE])
                .unhappy(&[REMOVE_SCHEMA_FILE])
                .on_exception(REMOVE_SCHEMA_FILE),
                Node::new(
                    REMOVE_SCHEMA_FILE,
                    "Remove the schema dump.",
                    remove_schema_file,
                )
                .happy(&[REMOVE_PG_DUMP_DIRECTORY])
                .unhappy(&[REMOVE_PG_DUMP_DIRECTORY])
                .on_exception(REMOVE_PG_DUMP_DIRECTORY),
                Node::new(
                    REMOVE_PG_DUMP_DIRECTORY,
                    "Remove the dump directory.",
                    remove_pg_dump_directory,
                )
                .happy(&[REMOVE_INTERMEDIATE_DIRECTORY])
                .unhappy(&[REMOVE_INTERMEDIATE_DIRECTORY])
                .on_exception(REMOVE_INTERMEDIATE_DIRECTORY),
                Node::new(
                    REMOVE_INTERMEDIATE_DIRECTORY,
                    "Remove the per-run working directory.",
                    remove_intermediate_directory,
                )
                .happy(&[REPORT_RESULTS])
                .unhappy(&[REPORT_RESULTS])
                .on_exception(REPORT_RESULTS),
                report_results(),
            ],
        )
    });

impl Machine for MachineBackupDatabase {
    fn definition() -> &'static Result<MachineDefinition<Self>, DefinitionError> {
        &DEFINITION
    }

    fn failure_prefix(&self) -> String {
        format!(
            "{} {} {}",
            self.state.client(),
            self.state.connection().host,
            self.state.connection().database
        )
    }
}
