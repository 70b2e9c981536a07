use chrono::{TimeZone, Utc};

use long_term_storage::machine::{execute, StepResult};
use long_term_storage::repository::{Connection, RepositoryError};
use long_term_storage::service::actions::{
    CompressAction, DumpAction, EncryptAction, PathAction, TransferAction,
};
use long_term_storage::service::backup_database::{
    DependencyBackupDatabase, MachineBackupDatabase, StateBackupDatabase,
};
use long_term_storage::shell::Secret;

fn ok_path() -> PathAction {
    Box::new(|_| Ok(()))
}

fn failing_path() -> PathAction {
    Box::new(|_| Err(RepositoryError::failed("unit test failure")))
}

fn ok_dump() -> DumpAction {
    Box::new(|_, _| Ok(()))
}

fn ok_compress() -> CompressAction {
    Box::new(|_, _, _| Ok(()))
}

fn failing_compress() -> CompressAction {
    Box::new(|_, _, _| Err(RepositoryError::failed("unit test failure")))
}

fn ok_encrypt() -> EncryptAction {
    Box::new(|_, _, _| Ok(()))
}

fn ok_transfer() -> TransferAction {
    Box::new(|_, _| Ok(()))
}

fn mocks() -> DependencyBackupDatabase {
    DependencyBackupDatabase {
        create_intermediate_directory: ok_path(),
        create_pg_dump_directory: ok_path(),
        backup_schema: ok_dump(),
        backup_data: ok_dump(),
        compress: ok_compress(),
        encrypt: ok_encrypt(),
        create_storage_directory: ok_path(),
        move_backup: ok_transfer(),
        remove_encrypted_backup: ok_path(),
        remove_tarball: ok_path(),
        remove_data_file: ok_path(),
        remove_schema_file: ok_path(),
        remove_pg_dump_directory: ok_path(),
        remove_intermediate_directory: ok_path(),
    }
}

fn create_machine(dependency: DependencyBackupDatabase) -> MachineBackupDatabase {
    let state = StateBackupDatabase::new(
        "acme",
        Connection {
            host: "db.example.net".to_string(),
            port: 5432,
            user: "backup_robot".to_string(),
            database: "orders".to_string(),
            password: Secret::new("hunter2"),
        },
        Utc.with_ymd_and_hms(2024, 3, 31, 23, 15, 0).unwrap(),
        "/mnt/backups/intermediate",
        "/mnt/backups/storage",
        "acme-archive",
    );
    MachineBackupDatabase::new(state, dependency)
}

#[test]
fn the_happy_path_runs_every_node_in_order() {
    let mut machine = create_machine(mocks());
    let results = execute(&mut machine).unwrap();

    let nodes: Vec<&str> = results.iter().map(StepResult::node).collect();
    assert_eq!(
        nodes,
        vec![
            "MachineBackupDatabase.create_intermediate_directory",
            "MachineBackupDatabase.create_pg_dump_directory",
            "MachineBackupDatabase.backup_schema",
            "MachineBackupDatabase.backup_data",
            "MachineBackupDatabase.compress",
            "MachineBackupDatabase.encrypt",
            "MachineBackupDatabase.create_storage_directory",
            "MachineBackupDatabase.move_backup",
            "MachineBackupDatabase.remove_encrypted_backup",
            "MachineBackupDatabase.remove_tarball",
            "MachineBackupDatabase.remove_data_file",
            "MachineBackupDatabase.remove_schema_file",
            "MachineBackupDatabase.remove_pg_dump_directory",
            "MachineBackupDatabase.remove_intermediate_directory",
            "MachineBackupDatabase.report_results",
        ]
    );
    assert!(results.iter().all(StepResult::is_success));
}

#[test]
fn an_early_failure_cleans_up_and_reports() {
    let mut dependency = mocks();
    dependency.create_intermediate_directory = failing_path();

    let mut machine = create_machine(dependency);
    let results = execute(&mut machine).unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0].is_failure());
    assert_eq!(
        results[0].node(),
        "MachineBackupDatabase.create_intermediate_directory"
    );
    assert_eq!(
        results[0].message(),
        Some("acme db.example.net orders unrecognized exception: unit test failure")
    );
    assert!(results[1].is_success());
    assert_eq!(
        results[1].node(),
        "MachineBackupDatabase.remove_intermediate_directory"
    );
    assert!(results[2].is_success());
    assert_eq!(results[2].node(), "MachineBackupDatabase.report_results");
}

#[test]
fn a_mid_path_failure_enters_the_cleanup_chain_at_the_matching_depth() {
    let mut dependency = mocks();
    dependency.compress = failing_compress();

    let mut machine = create_machine(dependency);
    let results = execute(&mut machine).unwrap();

    assert_eq!(results.len(), 11);
    assert!(results[..4].iter().all(StepResult::is_success));
    assert!(results[4].is_failure());
    assert_eq!(results[4].node(), "MachineBackupDatabase.compress");

    let cleanup: Vec<&str> = results[5..].iter().map(StepResult::node).collect();
    assert_eq!(
        cleanup,
        vec![
            "MachineBackupDatabase.remove_tarball",
            "MachineBackupDatabase.remove_data_file",
            "MachineBackupDatabase.remove_schema_file",
            "MachineBackupDatabase.remove_pg_dump_directory",
            "MachineBackupDatabase.remove_intermediate_directory",
            "MachineBackupDatabase.report_results",
        ]
    );
    assert!(results[5..].iter().all(StepResult::is_success));
}

#[test]
fn a_domain_failure_in_a_dump_travels_its_own_unhappy_edge() {
    let mut dependency = mocks();
    dependency.backup_schema = Box::new(|_, _| Err(RepositoryError::failed("unit test failure")));

    let mut machine = create_machine(dependency);
    let results = execute(&mut machine).unwrap();

    assert_eq!(results.len(), 7);
    assert!(results[2].is_failure());
    assert_eq!(results[2].node(), "MachineBackupDatabase.backup_schema");
    assert_eq!(results[3].node(), "MachineBackupDatabase.remove_schema_file");
    assert_eq!(
        results.last().unwrap().node(),
        "MachineBackupDatabase.report_results"
    );
}
