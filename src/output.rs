use long_term_storage::StepResult;

/// Writes each failure's display string to the diagnostic stream and
/// returns the failure count.
pub fn report_failures(results: &[StepResult]) -> usize {
    let failures: Vec<&StepResult> = results.iter().filter(|result| result.is_failure()).collect();
    for failure in &failures {
        eprintln!("Failure: {failure}");
    }
    failures.len()
}

/// Process exit code convention: the number of failures, zero meaning
/// all green.
pub fn failure_exit_code(failures: usize) -> i32 {
    i32::try_from(failures).unwrap_or(i32::MAX)
}
