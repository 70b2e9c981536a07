#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::repository::Connection;

/// State for one backup-and-encrypt run.  Every field is a frozen input;
/// the derived paths below are pure functions of them.
pub struct StateBackupDatabase {
    client: String,
    connection: Connection,
    timestamp: DateTime<Utc>,
    intermediate_root: PathBuf,
    storage_root: PathBuf,
    gpg_key_name: String,
}

impl StateBackupDatabase {
    pub fn new(
        client: impl Into<String>,
        connection: Connection,
        timestamp: DateTime<Utc>,
        intermediate_root: impl Into<PathBuf>,
        storage_root: impl Into<PathBuf>,
        gpg_key_name: impl Into<String>,
    ) -> Self {
        Self {
            client: client.into(),
            connection,
            timestamp,
            intermediate_root: intermediate_root.into(),
            storage_root: storage_root.into(),
            gpg_key_name: gpg_key_name.into(),
        }
    }

    #[must_use]
    pub fn client(&self) -> &str {
        &self.client
    }

    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.connection
    }

    #[must_use]
    pub fn gpg_key_name(&self) -> &str {
        &self.gpg_key_name
    }

    fn stamp(&self) -> String {
        self.timestamp.format("%Y-%m-%d_%H-%M-%S").to_string()
    }

    /// The per-run working directory on the intermediate share.
    #[must_use]
    pub fn intermediate_dir(&self) -> PathBuf {
        self.intermediate_root.join(format!(
            "{}_{}_{}",
            self.client,
            self.connection.database,
            self.stamp()
        ))
    }

    /// The directory name `pg_dump` writes into, relative to the
    /// intermediate directory.
    #[must_use]
    pub const fn pg_dump_dir_name() -> &'static str {
        "pg_dump"
    }

    #[must_use]
    pub fn pg_dump_dir(&self) -> PathBuf {
        self.intermediate_dir().join(Self::pg_dump_dir_name())
    }

    #[must_use]
    pub fn schema_file(&self) -> PathBuf {
        self.pg_dump_dir().join("schema.sql")
    }

    #[must_use]
    pub fn data_file(&self) -> PathBuf {
        self.pg_dump_dir().join("data.sql")
    }

    #[must_use]
    pub fn tarball_name(&self) -> String {
        format!("{}_{}.tar.bz2", self.connection.database, self.stamp())
    }

    #[must_use]
    pub fn tarball_path(&self) -> PathBuf {
        self.intermediate_dir().join(self.tarball_name())
    }

    #[must_use]
    pub fn encrypted_path(&self) -> PathBuf {
        self.intermediate_dir()
            .join(format!("{}.gpg", self.tarball_name()))
    }

    #[must_use]
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_root.join(&self.client)
    }

    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.storage_dir().join(format!("{}.gpg", self.tarball_name()))
    }

    #[must_use]
    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }
}
