use long_term_storage::machine::{execute, StepResult};
use long_term_storage::repository::RepositoryError;
use long_term_storage::service::actions::{EncryptAction, PathAction, TransferAction};
use long_term_storage::service::archive_encrypted::{
    DependencyArchiveEncrypted, MachineArchiveEncrypted, StateArchiveEncrypted,
};

fn ok_path() -> PathAction {
    Box::new(|_| Ok(()))
}

fn ok_transfer() -> TransferAction {
    Box::new(|_, _| Ok(()))
}

fn failing_transfer() -> TransferAction {
    Box::new(|_, _| Err(RepositoryError::failed("unit test failure")))
}

fn ok_encrypt() -> EncryptAction {
    Box::new(|_, _, _| Ok(()))
}

fn mocks() -> DependencyArchiveEncrypted {
    DependencyArchiveEncrypted {
        ensure_staging_directory: ok_path(),
        copy_to_staging: ok_transfer(),
        encrypt_file: ok_encrypt(),
        remove_copied_file: ok_path(),
        remove_encrypted_file: ok_path(),
        ensure_archive_directory: ok_path(),
        move_to_archive: ok_transfer(),
        remove_from_archive: ok_path(),
    }
}

fn create_machine(dependency: DependencyArchiveEncrypted) -> MachineArchiveEncrypted {
    let state =
        StateArchiveEncrypted::new("/source/file.txt", "/staging", "/archive", "test_key");
    MachineArchiveEncrypted::new(state, dependency)
}

#[test]
fn the_happy_path_stages_encrypts_and_archives() {
    let mut machine = create_machine(mocks());
    let results = execute(&mut machine).unwrap();

    let nodes: Vec<&str> = results.iter().map(StepResult::node).collect();
    assert_eq!(
        nodes,
        vec![
            "MachineArchiveEncrypted.ensure_staging_directory",
            "MachineArchiveEncrypted.copy_to_staging",
            "MachineArchiveEncrypted.encrypt_file",
            "MachineArchiveEncrypted.ensure_archive_directory",
            "MachineArchiveEncrypted.move_to_archive",
            "MachineArchiveEncrypted.report_results",
        ]
    );
    assert!(results.iter().all(StepResult::is_success));
}

#[test]
fn a_staging_directory_failure_goes_straight_to_reporting() {
    let mut dependency = mocks();
    dependency.ensure_staging_directory =
        Box::new(|_| Err(RepositoryError::failed("unit test failure")));

    let mut machine = create_machine(dependency);
    let results = execute(&mut machine).unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].is_failure());
    assert_eq!(
        results[0].node(),
        "MachineArchiveEncrypted.ensure_staging_directory"
    );
    assert!(results[1].is_success());
    assert_eq!(results[1].node(), "MachineArchiveEncrypted.report_results");
}

#[test]
fn a_copy_failure_removes_the_copied_file() {
    let mut dependency = mocks();
    dependency.copy_to_staging = failing_transfer();

    let mut machine = create_machine(dependency);
    let results = execute(&mut machine).unwrap();

    assert_eq!(results.len(), 4);
    assert!(results[0].is_success());
    assert!(results[1].is_failure());
    assert_eq!(results[1].node(), "MachineArchiveEncrypted.copy_to_staging");
    assert_eq!(
        results[2].node(),
        "MachineArchiveEncrypted.remove_copied_file"
    );
    assert_eq!(results[3].node(), "MachineArchiveEncrypted.report_results");
}

#[test]
fn a_move_failure_rolls_back_both_staged_files() {
    let mut dependency = mocks();
    dependency.move_to_archive = failing_transfer();

    let mut machine = create_machine(dependency);
    let results = execute(&mut machine).unwrap();

    let nodes: Vec<&str> = results.iter().map(StepResult::node).collect();
    assert_eq!(
        nodes,
        vec![
            "MachineArchiveEncrypted.ensure_staging_directory",
            "MachineArchiveEncrypted.copy_to_staging",
            "MachineArchiveEncrypted.encrypt_file",
            "MachineArchiveEncrypted.ensure_archive_directory",
            "MachineArchiveEncrypted.move_to_archive",
            "MachineArchiveEncrypted.remove_encrypted_file",
            "MachineArchiveEncrypted.remove_copied_file",
            "MachineArchiveEncrypted.report_results",
        ]
    );
    assert!(results[4].is_failure());
    assert_eq!(
        results.iter().filter(|result| result.is_failure()).count(),
        1
    );
}
