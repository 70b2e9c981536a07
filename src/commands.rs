use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use clap::Parser;
use thiserror::Error;

use long_term_storage::config::{
    generate_key_file, Config, ConfigError, DEFAULT_CONFIG_FILE, DEFAULT_KEY_FILE,
};
use long_term_storage::machine::{execute, DefinitionError};
use long_term_storage::repository::{az, Connection, RepositoryError};
use long_term_storage::service::archive_encrypted::{
    DependencyArchiveEncrypted, MachineArchiveEncrypted, StateArchiveEncrypted,
};
use long_term_storage::service::backup_databases::StateBackupDatabases;
use long_term_storage::service::dynamic_mount::{
    DependencyDynamicMount, MachineDynamicMount, StateDynamicMount,
};
use long_term_storage::service::eom_retention::{
    DependencyEomRetention, MachineEomRetention, StateEomRetention,
};
use long_term_storage::shell::Secret;

use crate::cli::{Cli, Commands, SecretCommands};
use crate::output::report_failures;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Invalid(String),
}

/// Dispatches the parsed command line and returns the failure count for
/// the process exit code.
pub fn run() -> Result<usize, CommandError> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let key_path = cli
        .key_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_KEY_FILE));

    match cli.command {
        Commands::Backup {
            client,
            host,
            tenant,
            authority_host,
        } => backup(
            &config_path,
            &key_path,
            &client,
            &host,
            tenant.as_deref(),
            authority_host.as_deref(),
        ),
        Commands::Archive {
            source,
            staging_dir,
            archive_dir,
            gpg_key,
        } => archive(&source, &staging_dir, &archive_dir, &gpg_key),
        Commands::Retention { client } => retention(&config_path, &key_path, &client),
        Commands::Secret { command } => {
            secret(&config_path, &key_path, &command)?;
            Ok(0)
        }
    }
}

fn backup(
    config_path: &Path,
    key_path: &Path,
    client: &str,
    host: &str,
    tenant: Option<&str>,
    authority_host: Option<&str>,
) -> Result<usize, CommandError> {
    let config = Config::load(config_path, key_path)?;
    let connection = connection(&config, host, tenant, authority_host)?;
    let now = Utc::now();
    let cutoff = now - Duration::days(config.integer("retention", "keep_days")?);

    let backup_state = StateBackupDatabases::new(
        client,
        connection,
        now,
        config.string("storage", "intermediate_path")?,
        config.string("storage", "archive_path")?,
        config.string("storage", "gpg_key")?,
        cutoff,
    );
    let state = StateDynamicMount::new(
        config.string("storage", "unc")?,
        config.string("storage", "mount_point")?,
        config.string("storage", "account_name")?,
        config.secrets().value("storage", "account_key")?,
        backup_state,
    );

    let mut machine = MachineDynamicMount::new(state, DependencyDynamicMount::new());
    let results = execute(&mut machine)?;
    Ok(report_failures(&results))
}

fn archive(
    source: &Path,
    staging_dir: &Path,
    archive_dir: &Path,
    gpg_key: &str,
) -> Result<usize, CommandError> {
    let state = StateArchiveEncrypted::new(source, staging_dir, archive_dir, gpg_key);
    let mut machine = MachineArchiveEncrypted::new(state, DependencyArchiveEncrypted::new());
    let results = execute(&mut machine)?;
    Ok(report_failures(&results))
}

fn retention(config_path: &Path, key_path: &Path, client: &str) -> Result<usize, CommandError> {
    let config = Config::load(config_path, key_path)?;
    let cutoff = Utc::now() - Duration::days(config.integer("retention", "keep_days")?);
    let archive_root = PathBuf::from(config.string("storage", "archive_path")?).join(client);

    let state = StateEomRetention::new(client, archive_root, cutoff);
    let mut machine = MachineEomRetention::new(state, DependencyEomRetention::new());
    let results = execute(&mut machine)?;
    Ok(report_failures(&results))
}

fn secret(
    config_path: &Path,
    key_path: &Path,
    command: &SecretCommands,
) -> Result<(), CommandError> {
    match command {
        SecretCommands::Set { group, key, value } => {
            let mut config = Config::load(config_path, key_path)?;
            config.set_secret(group, key, value)?;
            Ok(())
        }
        SecretCommands::GenerateKey { path } => {
            generate_key_file(path)?;
            Ok(())
        }
    }
}

fn connection(
    config: &Config,
    host: &str,
    tenant: Option<&str>,
    authority_host: Option<&str>,
) -> Result<Connection, CommandError> {
    let port = config.integer("postgres", "port")?;
    let port = u16::try_from(port)
        .map_err(|_| CommandError::Invalid(format!("postgres.port out of range: {port}")))?;

    // With a tenant the password is an Entra ID access token; otherwise
    // it comes from the encrypted configuration.
    let password: Secret = if tenant.is_some() || authority_host.is_some() {
        az::postgres_access_token(tenant, authority_host)?
    } else {
        config.secrets().value("postgres", "password")?
    };

    Ok(Connection {
        host: host.to_string(),
        port,
        user: config.string("postgres", "user")?,
        database: config.string("postgres", "maintenance_database")?,
        password,
    })
}
