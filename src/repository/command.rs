#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command as OsCommand, Stdio};
use std::time::Instant;

use tracing::debug;

use super::error::{RepositoryError, Result};
use crate::shell::{Atom, SpaceDelimited};

/// Captured output of a completed command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Optional execution context.  Environment values are [`Atom`]s so a
/// secret (a database password, an account key) stays masked in every
/// rendering on its way to the process environment.
#[derive(Default)]
pub struct RunOptions {
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, Atom)>,
    pub stdin: Option<Atom>,
}

/// Runs *command* and captures its output.
///
/// # Errors
/// Returns an error carrying the command's stderr when the exit code is
/// not zero, or the spawn failure.
pub fn run(command: &SpaceDelimited) -> Result<CommandOutput> {
    run_with(command, RunOptions::default())
}

/// Runs *command* with an explicit execution context.  The argument
/// vector is the reveal form; every log record uses the display form.
///
/// # Errors
/// Returns an error carrying the command's stderr when the exit code is
/// not zero, or the spawn failure.
pub fn run_with(command: &SpaceDelimited, options: RunOptions) -> Result<CommandOutput> {
    let started = Instant::now();
    debug!("  {command} - started");

    let argv = command.reveal();
    let (program, arguments) = argv
        .split_first()
        .ok_or_else(|| RepositoryError::failed("empty command"))?;

    let mut invocation = OsCommand::new(program);
    invocation.args(arguments);
    if let Some(cwd) = &options.cwd {
        invocation.current_dir(cwd);
    }
    for (name, value) in &options.env {
        invocation.env(name, value.reveal());
    }

    let output = if let Some(input) = &options.stdin {
        let mut child = invocation
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.reveal().as_bytes())?;
        }
        child.wait_with_output()?
    } else {
        invocation.output()?
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        debug!(
            "  {command} - error: {} - runtime: {:?}",
            output.status,
            started.elapsed()
        );
        return Err(RepositoryError::failed(stderr));
    }

    debug!("  {command} - completed - runtime: {:?}", started.elapsed());
    Ok(CommandOutput { stdout, stderr })
}
