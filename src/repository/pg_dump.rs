#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::path::Path;

use super::command::{run_with, RunOptions};
use super::error::Result;
use crate::shell::{Secret, SpaceDelimited};

/// Connection information for a PostgreSQL instance.  The password is a
/// masking secret and only ever travels through the process environment.
#[derive(Debug, Clone)]
pub struct Connection {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
    pub password: Secret,
}

fn connection_environment(connection: &Connection) -> Vec<(String, crate::shell::Atom)> {
    vec![
        ("PGSSLMODE".to_string(), "require".into()),
        ("PGPASSWORD".to_string(), connection.password.clone().into()),
    ]
}

/// Pulls a SQL rendering of the database schema to *path*.  Ownership is
/// not backed up.
///
/// # Errors
/// Returns an error carrying pg_dump's stderr when the exit code is not
/// zero.
pub fn dump_schema(connection: &Connection, path: &Path) -> Result<()> {
    let command = SpaceDelimited::new(vec![
        "pg_dump".into(),
        "-h".into(),
        connection.host.clone().into(),
        "-p".into(),
        connection.port.to_string().into(),
        "-U".into(),
        connection.user.clone().into(),
        "--no-owner".into(),
        "--schema-only".into(),
        connection.database.clone().into(),
        "--file".into(),
        path.display().to_string().into(),
    ]);
    execute(&command, connection)
}

/// Pulls a SQL rendering of the data in the database to *path*.
///
/// # Errors
/// Returns an error carrying pg_dump's stderr when the exit code is not
/// zero.
pub fn dump_data(connection: &Connection, path: &Path) -> Result<()> {
    let command = SpaceDelimited::new(vec![
        "pg_dump".into(),
        "-h".into(),
        connection.host.clone().into(),
        "-p".into(),
        connection.port.to_string().into(),
        "-U".into(),
        connection.user.clone().into(),
        "--no-owner".into(),
        "--data-only".into(),
        connection.database.clone().into(),
        "--file".into(),
        path.display().to_string().into(),
    ]);
    execute(&command, connection)
}

fn execute(command: &SpaceDelimited, connection: &Connection) -> Result<()> {
    run_with(
        command,
        RunOptions {
            env: connection_environment(connection),
            ..RunOptions::default()
        },
    )?;
    Ok(())
}
