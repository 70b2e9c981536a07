#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::path::Path;

use super::command::{run_with, RunOptions};
use super::error::Result;
use super::pg_dump::Connection;
use crate::shell::SpaceDelimited;

/// Lists the non-template databases on the instance.
///
/// # Errors
/// Returns an error carrying psql's stderr when the exit code is not
/// zero.
pub fn list_databases(connection: &Connection) -> Result<Vec<String>> {
    let command = SpaceDelimited::new(vec![
        "psql".into(),
        "-h".into(),
        connection.host.clone().into(),
        "-p".into(),
        connection.port.to_string().into(),
        "-U".into(),
        connection.user.clone().into(),
        "-d".into(),
        connection.database.clone().into(),
        "--tuples-only".into(),
        "--no-align".into(),
        "--command".into(),
        "SELECT datname FROM pg_database WHERE NOT datistemplate".into(),
    ]);
    let output = execute(&command, connection)?;
    Ok(output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect())
}

/// Restores a SQL rendering of a backup into the connected database.
///
/// # Errors
/// Returns an error carrying psql's stderr when the exit code is not
/// zero.
pub fn restore(connection: &Connection, path: &Path) -> Result<()> {
    let command = SpaceDelimited::new(vec![
        "psql".into(),
        "-h".into(),
        connection.host.clone().into(),
        "-p".into(),
        connection.port.to_string().into(),
        "-U".into(),
        connection.user.clone().into(),
        "-d".into(),
        connection.database.clone().into(),
        "--file".into(),
        path.display().to_string().into(),
    ]);
    execute(&command, connection)?;
    Ok(())
}

fn execute(command: &SpaceDelimited, connection: &Connection) -> Result<String> {
    let output = run_with(
        command,
        RunOptions {
            env: vec![
                ("PGSSLMODE".to_string(), "require".into()),
                ("PGPASSWORD".to_string(), connection.password.clone().into()),
            ],
            ..RunOptions::default()
        },
    )?;
    Ok(output.stdout)
}
