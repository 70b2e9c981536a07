#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::repository::Connection;
use crate::service::backup_database::StateBackupDatabase;
use crate::service::eom_retention::StateEomRetention;

/// State for a per-client backup run.  Inputs are frozen; the discovered
/// database list is the one mutable scratch field, written by
/// `fetch_databases` and consumed by `backup_databases`.
pub struct StateBackupDatabases {
    client: String,
    connection: Connection,
    timestamp: DateTime<Utc>,
    intermediate_root: PathBuf,
    storage_root: PathBuf,
    gpg_key_name: String,
    retention_cutoff: DateTime<Utc>,
    databases: Vec<String>,
}

impl StateBackupDatabases {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client: impl Into<String>,
        connection: Connection,
        timestamp: DateTime<Utc>,
        intermediate_root: impl Into<PathBuf>,
        storage_root: impl Into<PathBuf>,
        gpg_key_name: impl Into<String>,
        retention_cutoff: DateTime<Utc>,
    ) -> Self {
        Self {
            client: client.into(),
            connection,
            timestamp,
            intermediate_root: intermediate_root.into(),
            storage_root: storage_root.into(),
            gpg_key_name: gpg_key_name.into(),
            retention_cutoff,
            databases: Vec::new(),
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
    pub fn databases(&self) -> &[String] {
        &self.databases
    }

    pub fn set_databases(&mut self, databases: Vec<String>) {
        self.databases = databases;
    }

    /// The state record for the nested backup of one discovered database.
    #[must_use]
    pub fn backup_state_for(&self, database: &str) -> StateBackupDatabase {
        let mut connection = self.connection.clone();
        connection.database = database.to_string();
        StateBackupDatabase::new(
            self.client.clone(),
            connection,
            self.timestamp,
            self.intermediate_root.clone(),
            self.storage_root.clone(),
            self.gpg_key_name.clone(),
        )
    }

    /// The state record for the nested retention sweep.
    #[must_use]
    pub fn retention_state(&self) -> StateEomRetention {
        StateEomRetention::new(
            self.client.clone(),
            self.storage_root.join(&self.client),
            self.retention_cutoff,
        )
    }
}
