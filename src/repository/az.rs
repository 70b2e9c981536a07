#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use super::command::{run_with, RunOptions};
use super::error::{RepositoryError, Result};
use crate::shell::{Secret, SpaceDelimited};

/// Fetches an Entra ID access token for PostgreSQL through the Azure CLI.
/// The token comes back wrapped as a masking secret, ready to ride in
/// `PGPASSWORD`.
///
/// # Errors
/// Returns an error carrying az's stderr when the exit code is not zero.
pub fn postgres_access_token(tenant: Option<&str>, authority_host: Option<&str>) -> Result<Secret> {
    let mut line: Vec<crate::shell::SpaceItem> = vec![
        "az".into(),
        "account".into(),
        "get-access-token".into(),
        "--resource-type".into(),
        "oss-rdbms".into(),
        "--query".into(),
        "accessToken".into(),
        "--output".into(),
        "tsv".into(),
    ];
    if let Some(tenant) = tenant {
        line.push("--tenant".into());
        line.push(tenant.into());
    }
    let command = SpaceDelimited::new(line);

    let env = authority_host
        .map(|host| vec![("AZURE_AUTHORITY_HOST".to_string(), host.into())])
        .unwrap_or_default();

    let output = run_with(&command, RunOptions { env, ..RunOptions::default() })?;
    let token = output.stdout.trim();
    if token.is_empty() {
        return Err(RepositoryError::failed("az returned an empty access token"));
    }
    Ok(Secret::new(token))
}
