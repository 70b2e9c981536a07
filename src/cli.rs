use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ltstore")]
#[command(about = "Long-term archival of database backups")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub key_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mount the backup share, back up every database for a client, run
    /// retention, and unmount.
    Backup {
        client: String,
        host: String,

        /// Entra ID tenant; when present the database password is an
        /// access token fetched through the Azure CLI.
        #[arg(long)]
        tenant: Option<String>,

        /// Authority host for the token fetch.
        #[arg(long)]
        authority_host: Option<String>,
    },
    /// Archive and encrypt a single file.
    Archive {
        source: PathBuf,
        staging_dir: PathBuf,
        archive_dir: PathBuf,
        gpg_key: String,
    },
    /// Run the end-of-month retention sweep for a client.
    Retention { client: String },
    /// Manage encrypted configuration values.
    Secret {
        #[command(subcommand)]
        command: SecretCommands,
    },
}

#[derive(Subcommand)]
pub enum SecretCommands {
    /// Encrypt and store a value in the configuration file.
    Set {
        group: String,
        key: String,
        value: String,
    },
    /// Generate a fresh encryption key at the named path.
    GenerateKey { path: PathBuf },
}
